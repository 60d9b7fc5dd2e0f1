//! In-memory implementations of the repository ports for use case tests.
//!
//! `FakeShop` keeps every table in one mutex-guarded `State`. Checkout works
//! on a copy of that state and swaps it in only when everything succeeded,
//! which gives the tests the same all-or-nothing behaviour as the database
//! transaction.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::errors::{CheckoutError, OrderStatusError, PaymentError};
use crate::application::ports::DeleteOutcome;
use crate::application::ports::address_repository::AddressRepository;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::cart_repository::CartRepository;
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::order_repository::{CheckoutCommand, OrderRepository, PlacedOrder};
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::user_repository::{NewUser, UserRepository, UserRow};
use crate::application::services::credentials;
use crate::domain::addresses::address::{Address, NewAddress};
use crate::domain::carts::cart::{Cart, CartLine};
use crate::domain::catalog::category::Category;
use crate::domain::catalog::product::{
    Page, Product, ProductFields, ProductImage, ProductQuery, ProductSort,
};
use crate::domain::orders::checkout::{CheckoutLine, CheckoutRejection, plan_checkout};
use crate::domain::orders::order::{Order, OrderItem, OrderStatus, StatusChange};
use crate::domain::payments::payment::{Payment, PaymentAttempt, PaymentProvider, PaymentStatus};
use crate::domain::users::user::UserRole;

#[derive(Clone)]
struct FakeUser {
    row: UserRow,
    reset: Option<(String, DateTime<Utc>)>,
}

#[derive(Clone)]
struct FakeLine {
    id: Uuid,
    cart_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
}

#[derive(Clone, Default)]
struct State {
    users: Vec<FakeUser>,
    categories: Vec<Category>,
    products: Vec<Product>,
    // (cart id, user id)
    carts: Vec<(Uuid, Uuid)>,
    lines: Vec<FakeLine>,
    addresses: Vec<Address>,
    orders: Vec<Order>,
    tick: i64,
}

impl State {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn stamp(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc::now() + Duration::milliseconds(self.tick)
    }

    fn product_mut(&mut self, id: Uuid) -> &mut Product {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .expect("unknown product")
    }

    fn cart_of(&mut self, user_id: Uuid) -> Uuid {
        if let Some((id, _)) = self.carts.iter().find(|(_, u)| *u == user_id) {
            return *id;
        }
        let id = Uuid::new_v4();
        self.carts.push((id, user_id));
        id
    }

    fn insert_address(&mut self, user_id: Uuid, input: &NewAddress) -> Address {
        let first = !self.addresses.iter().any(|a| a.user_id == user_id);
        let is_default = first || input.is_default;
        if is_default {
            for a in self.addresses.iter_mut().filter(|a| a.user_id == user_id) {
                a.is_default = false;
            }
        }
        let address = Address {
            id: Uuid::new_v4(),
            user_id,
            street: input.street.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            zip_code: input.zip_code.clone(),
            country: input.country.clone(),
            is_default,
            created_at: self.stamp(),
        };
        self.addresses.push(address.clone());
        address
    }
}

#[derive(Default)]
pub(crate) struct FakeShop {
    state: Mutex<State>,
    audit: Mutex<Vec<AuditEvent>>,
    fail_audit: AtomicBool,
}

pub(crate) fn sample_address(is_default: bool) -> NewAddress {
    NewAddress {
        street: "123 Main St".into(),
        city: "New York".into(),
        state: "NY".into(),
        zip_code: "10001".into(),
        country: "USA".into(),
        is_default,
    }
}

impl FakeShop {
    pub fn add_user(&self, email: &str, password: &str, role: UserRole) -> Uuid {
        let hash = credentials::hash_password(password).unwrap();
        let mut st = self.state.lock().unwrap();
        let id = Uuid::new_v4();
        let created_at = st.stamp();
        st.users.push(FakeUser {
            row: UserRow {
                id,
                email: email.to_ascii_lowercase(),
                first_name: "Test".into(),
                last_name: "User".into(),
                role,
                password_hash: Some(hash),
                created_at,
            },
            reset: None,
        });
        id
    }

    pub fn reset_token_of(&self, user_id: Uuid) -> Option<(String, DateTime<Utc>)> {
        let st = self.state.lock().unwrap();
        st.users
            .iter()
            .find(|u| u.row.id == user_id)
            .and_then(|u| u.reset.clone())
    }

    pub fn audit_events(&self) -> Vec<&'static str> {
        self.audit.lock().unwrap().iter().map(|e| e.event).collect()
    }

    pub fn fail_audit_writes(&self) {
        self.fail_audit.store(true, Ordering::SeqCst);
    }

    pub fn add_category(&self, name: &str) -> Uuid {
        let mut st = self.state.lock().unwrap();
        let id = Uuid::new_v4();
        let created_at = st.stamp();
        st.categories.push(Category {
            id,
            name: name.into(),
            description: None,
            parent_category_id: None,
            parent_category_name: None,
            created_at,
        });
        id
    }

    pub fn add_product(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
        stock: i32,
        category_id: Uuid,
    ) -> Uuid {
        let mut st = self.state.lock().unwrap();
        let category_name = st
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let id = Uuid::new_v4();
        let created_at = st.stamp();
        st.products.push(Product {
            id,
            name: name.into(),
            sku: sku.into(),
            description: String::new(),
            price,
            stock_quantity: stock,
            category_id,
            category_name,
            is_active: true,
            images: vec![ProductImage {
                id: Uuid::new_v4(),
                url: format!("https://img.test/{sku}.png"),
                alt_text: name.into(),
                display_order: 1,
            }],
            created_at,
            updated_at: None,
        });
        id
    }

    pub fn set_price(&self, product_id: Uuid, price: Decimal) {
        self.state.lock().unwrap().product_mut(product_id).price = price;
    }

    pub fn set_active(&self, product_id: Uuid, active: bool) {
        self.state.lock().unwrap().product_mut(product_id).is_active = active;
    }

    pub fn set_stock(&self, product_id: Uuid, stock: i32) {
        self.state.lock().unwrap().product_mut(product_id).stock_quantity = stock;
    }

    pub fn stock_of(&self, product_id: Uuid) -> i32 {
        self.state.lock().unwrap().product_mut(product_id).stock_quantity
    }

    pub fn add_address(&self, user_id: Uuid) -> Uuid {
        let mut st = self.state.lock().unwrap();
        st.insert_address(user_id, &sample_address(false)).id
    }

    /// Puts lines straight into the user's cart at the current price.
    pub fn fill_cart(&self, user_id: Uuid, lines: &[(Uuid, i32)]) {
        let mut st = self.state.lock().unwrap();
        let cart_id = st.cart_of(user_id);
        for &(product_id, quantity) in lines {
            let unit_price = st.product_mut(product_id).price;
            st.lines.push(FakeLine {
                id: Uuid::new_v4(),
                cart_id,
                product_id,
                quantity,
                unit_price,
            });
        }
    }

    pub fn cart_size(&self, user_id: Uuid) -> usize {
        let st = self.state.lock().unwrap();
        let Some((cart_id, _)) = st.carts.iter().find(|(_, u)| *u == user_id) else {
            return 0;
        };
        st.lines.iter().filter(|l| l.cart_id == *cart_id).count()
    }

    pub fn order_count(&self) -> usize {
        self.state.lock().unwrap().orders.len()
    }

    /// Checks out the given lines with a mock payment, bypassing the audit log.
    pub async fn place_order(&self, user_id: Uuid, lines: &[(Uuid, i32)]) -> Order {
        let address = self.add_address(user_id);
        self.fill_cart(user_id, lines);
        let cmd = CheckoutCommand {
            user_id,
            shipping_address_id: address,
            payment_provider: "Mock".into(),
            order_number: format!("ORD-TEST-{}", self.order_count() + 1),
        };
        let placed = self
            .checkout(&cmd, &FakePayments::approving())
            .await
            .unwrap();
        OrderRepository::get(self, placed.order_id)
            .await
            .unwrap()
            .unwrap()
    }
}

#[async_trait]
impl UserRepository for FakeShop {
    async fn create_user(&self, user: &NewUser<'_>) -> anyhow::Result<Option<UserRow>> {
        let mut st = self.state.lock().unwrap();
        if st.users.iter().any(|u| u.row.email == user.email) {
            return Ok(None);
        }
        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
            role: user.role,
            password_hash: Some(user.password_hash.into()),
            created_at: st.stamp(),
        };
        st.users.push(FakeUser {
            row: row.clone(),
            reset: None,
        });
        Ok(Some(row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|u| u.row.email == email)
            .map(|u| u.row.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|u| u.row.id == id)
            .map(|u| u.row.clone()))
    }

    async fn store_reset_token(
        &self,
        user_id: Uuid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut st = self.state.lock().unwrap();
        if let Some(u) = st.users.iter_mut().find(|u| u.row.id == user_id) {
            u.reset = Some((token_digest.into(), expires_at));
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<UserRow>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|u| {
                matches!(&u.reset, Some((digest, expires)) if digest == token_digest && *expires > now)
            })
            .map(|u| u.row.clone()))
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let Some(u) = st.users.iter_mut().find(|u| u.row.id == user_id) else {
            return Ok(false);
        };
        u.row.password_hash = Some(password_hash.into());
        u.reset = None;
        Ok(true)
    }

    async fn clear_expired_reset_tokens(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut st = self.state.lock().unwrap();
        let mut cleared = 0;
        for u in st.users.iter_mut() {
            if matches!(&u.reset, Some((_, expires)) if *expires <= now) {
                u.reset = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

#[async_trait]
impl CategoryRepository for FakeShop {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let mut out = self.state.lock().unwrap().categories.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let st = self.state.lock().unwrap();
        Ok(st.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_category_id: Option<Uuid>,
    ) -> anyhow::Result<Category> {
        let mut st = self.state.lock().unwrap();
        let parent_category_name = parent_category_id.and_then(|pid| {
            st.categories
                .iter()
                .find(|c| c.id == pid)
                .map(|c| c.name.clone())
        });
        let category = Category {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.map(str::to_string),
            parent_category_id,
            parent_category_name,
            created_at: st.stamp(),
        };
        st.categories.push(category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let mut st = self.state.lock().unwrap();
        if !st.categories.iter().any(|c| c.id == id) {
            return Ok(DeleteOutcome::NotFound);
        }
        let referenced = st.products.iter().any(|p| p.category_id == id)
            || st
                .categories
                .iter()
                .any(|c| c.parent_category_id == Some(id));
        if referenced {
            return Ok(DeleteOutcome::InUse);
        }
        st.categories.retain(|c| c.id != id);
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl ProductRepository for FakeShop {
    async fn list(&self, query: &ProductQuery) -> anyhow::Result<Page<Product>> {
        let st = self.state.lock().unwrap();
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut hits: Vec<Product> = st
            .products
            .iter()
            .filter(|p| {
                needle.as_deref().is_none_or(|n| {
                    p.name.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
                })
            })
            .filter(|p| query.category_id.is_none_or(|c| p.category_id == c))
            .filter(|p| query.min_price.is_none_or(|m| p.price >= m))
            .filter(|p| query.max_price.is_none_or(|m| p.price <= m))
            .cloned()
            .collect();
        hits.sort_by(|a, b| match query.sort {
            ProductSort::Name => a.name.cmp(&b.name),
            ProductSort::Price => a.price.cmp(&b.price),
            ProductSort::CreatedAt => a.created_at.cmp(&b.created_at),
        });
        if query.descending {
            hits.reverse();
        }
        let total = hits.len() as i64;
        let items = hits
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.page_size as usize)
            .collect();
        Ok(Page::new(items, total, query.page, query.page_size))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let st = self.state.lock().unwrap();
        Ok(st.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, sku: &str, fields: &ProductFields) -> anyhow::Result<Option<Uuid>> {
        let mut st = self.state.lock().unwrap();
        if st.products.iter().any(|p| p.sku == sku) {
            return Ok(None);
        }
        let category_name = st
            .categories
            .iter()
            .find(|c| c.id == fields.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let id = Uuid::new_v4();
        let created_at = st.stamp();
        st.products.push(Product {
            id,
            name: fields.name.clone(),
            sku: sku.into(),
            description: fields.description.clone(),
            price: fields.price,
            stock_quantity: fields.stock_quantity,
            category_id: fields.category_id,
            category_name,
            is_active: true,
            images: vec![],
            created_at,
            updated_at: None,
        });
        Ok(Some(id))
    }

    async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        is_active: bool,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let category_name = st
            .categories
            .iter()
            .find(|c| c.id == fields.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let now = st.stamp();
        let Some(p) = st.products.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        p.name = fields.name.clone();
        p.description = fields.description.clone();
        p.price = fields.price;
        p.stock_quantity = fields.stock_quantity;
        p.category_id = fields.category_id;
        p.category_name = category_name;
        p.is_active = is_active;
        p.updated_at = Some(now);
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let mut st = self.state.lock().unwrap();
        if !st.products.iter().any(|p| p.id == id) {
            return Ok(DeleteOutcome::NotFound);
        }
        let ordered = st
            .orders
            .iter()
            .any(|o| o.items.iter().any(|i| i.product_id == id));
        let in_cart = st.lines.iter().any(|l| l.product_id == id);
        if ordered || in_cart {
            return Ok(DeleteOutcome::InUse);
        }
        st.products.retain(|p| p.id != id);
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl CartRepository for FakeShop {
    async fn get_or_create(&self, user_id: Uuid) -> anyhow::Result<Uuid> {
        Ok(self.state.lock().unwrap().cart_of(user_id))
    }

    async fn load(&self, cart_id: Uuid) -> anyhow::Result<Cart> {
        let st = self.state.lock().unwrap();
        let (_, user_id) = st
            .carts
            .iter()
            .find(|(id, _)| *id == cart_id)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("cart {cart_id} not found"))?;
        let lines = st
            .lines
            .iter()
            .filter(|l| l.cart_id == cart_id)
            .map(|l| {
                let product = st.products.iter().find(|p| p.id == l.product_id);
                CartLine {
                    id: l.id,
                    product_id: l.product_id,
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    image_url: product.and_then(|p| {
                        p.images
                            .iter()
                            .min_by_key(|i| i.display_order)
                            .map(|i| i.url.clone())
                    }),
                }
            })
            .collect();
        Ok(Cart {
            id: cart_id,
            user_id,
            lines,
        })
    }

    async fn insert_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> anyhow::Result<Option<Uuid>> {
        let mut st = self.state.lock().unwrap();
        let stock = st
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map_or(0, |p| p.stock_quantity);
        if let Some(line) = st
            .lines
            .iter_mut()
            .find(|l| l.cart_id == cart_id && l.product_id == product_id)
        {
            if line.quantity.saturating_add(quantity) > stock {
                return Ok(None);
            }
            line.quantity += quantity;
            line.unit_price = unit_price;
            return Ok(Some(line.id));
        }
        let id = Uuid::new_v4();
        st.lines.push(FakeLine {
            id,
            cart_id,
            product_id,
            quantity,
            unit_price,
        });
        Ok(Some(id))
    }

    async fn update_line(
        &self,
        cart_id: Uuid,
        line_id: Uuid,
        quantity: i32,
        unit_price: Option<Decimal>,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let Some(line) = st
            .lines
            .iter_mut()
            .find(|l| l.id == line_id && l.cart_id == cart_id)
        else {
            return Ok(false);
        };
        line.quantity = quantity;
        if let Some(price) = unit_price {
            line.unit_price = price;
        }
        Ok(true)
    }

    async fn remove_line(&self, cart_id: Uuid, line_id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let before = st.lines.len();
        st.lines
            .retain(|l| !(l.id == line_id && l.cart_id == cart_id));
        Ok(st.lines.len() != before)
    }

    async fn clear(&self, cart_id: Uuid) -> anyhow::Result<u64> {
        let mut st = self.state.lock().unwrap();
        let before = st.lines.len();
        st.lines.retain(|l| l.cart_id != cart_id);
        Ok((before - st.lines.len()) as u64)
    }
}

#[async_trait]
impl AddressRepository for FakeShop {
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Address>> {
        let st = self.state.lock().unwrap();
        let mut out: Vec<Address> = st
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(out)
    }

    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Address>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .addresses
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, address: &NewAddress) -> anyhow::Result<Address> {
        Ok(self.state.lock().unwrap().insert_address(user_id, address))
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let mut st = self.state.lock().unwrap();
        if !st
            .addresses
            .iter()
            .any(|a| a.id == id && a.user_id == user_id)
        {
            return Ok(DeleteOutcome::NotFound);
        }
        let shipped_to = st
            .orders
            .iter()
            .any(|o| o.shipping_address.as_ref().is_some_and(|a| a.id == id));
        if shipped_to {
            return Ok(DeleteOutcome::InUse);
        }
        let was_default = st.addresses.iter().any(|a| a.id == id && a.is_default);
        st.addresses.retain(|a| a.id != id);
        if was_default {
            if let Some(newest) = st
                .addresses
                .iter_mut()
                .filter(|a| a.user_id == user_id)
                .max_by_key(|a| a.created_at)
            {
                newest.is_default = true;
            }
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl OrderRepository for FakeShop {
    async fn checkout(
        &self,
        cmd: &CheckoutCommand,
        payments: &dyn PaymentProcessor,
    ) -> Result<PlacedOrder, CheckoutError> {
        let mut draft = self.state.lock().unwrap().clone();

        let cart_id = draft.cart_of(cmd.user_id);
        let cart_lines: Vec<FakeLine> = draft
            .lines
            .iter()
            .filter(|l| l.cart_id == cart_id)
            .cloned()
            .collect();
        if cart_lines.is_empty() {
            return Err(CheckoutRejection::EmptyCart.into());
        }
        let address = draft
            .addresses
            .iter()
            .find(|a| a.id == cmd.shipping_address_id && a.user_id == cmd.user_id)
            .cloned()
            .ok_or(CheckoutError::UnknownAddress)?;
        let checkout_lines: Vec<CheckoutLine> = cart_lines
            .iter()
            .map(|l| {
                let p = draft.product_mut(l.product_id);
                CheckoutLine {
                    product_id: l.product_id,
                    product_name: p.name.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    stock_quantity: p.stock_quantity,
                    is_active: p.is_active,
                }
            })
            .collect();
        let plan = plan_checkout(&checkout_lines)?;

        let order_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(plan.items.len());
        for (item, line) in plan.items.iter().zip(&checkout_lines) {
            draft.product_mut(item.product_id).stock_quantity -= item.quantity;
            items.push(OrderItem {
                id: Uuid::new_v4(),
                product_id: item.product_id,
                product_name: line.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        draft.lines.retain(|l| l.cart_id != cart_id);

        let attempt = payments
            .process(order_id, plan.total_amount, &cmd.payment_provider)
            .await?;
        let status = if attempt.status == PaymentStatus::Completed {
            OrderStatus::PaymentReceived
        } else {
            OrderStatus::Pending
        };
        let created_at = draft.stamp();
        draft.orders.push(Order {
            id: order_id,
            order_number: cmd.order_number.clone(),
            user_id: cmd.user_id,
            total_amount: plan.total_amount,
            status,
            created_at,
            updated_at: None,
            shipping_address: Some(address),
            items,
            payment: Some(Payment {
                id: Uuid::new_v4(),
                order_id,
                provider: attempt.provider.as_str().into(),
                status: attempt.status,
                transaction_id: attempt.transaction_id,
                payment_intent_id: attempt.payment_intent_id,
                amount: attempt.amount,
                created_at,
            }),
        });

        *self.state.lock().unwrap() = draft;
        Ok(PlacedOrder { order_id, status })
    }

    async fn get_for_user(&self, order_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Order>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .cloned())
    }

    async fn get(&self, order_id: Uuid) -> anyhow::Result<Option<Order>> {
        let st = self.state.lock().unwrap();
        Ok(st.orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Order>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Order>> {
        let st = self.state.lock().unwrap();
        Ok(st.orders.iter().rev().cloned().collect())
    }

    async fn change_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<StatusChange, OrderStatusError> {
        let mut st = self.state.lock().unwrap();
        let now = st.stamp();
        let idx = st
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or(OrderStatusError::NotFound(order_id))?;
        let change = st.orders[idx].status.transition_to(next)?;
        if change.is_noop() {
            return Ok(change);
        }
        if change.restock {
            let items = st.orders[idx].items.clone();
            for item in items {
                st.product_mut(item.product_id).stock_quantity += item.quantity;
            }
        }
        let order = &mut st.orders[idx];
        if change.refund_payment {
            if let Some(payment) = order.payment.as_mut() {
                payment.status = PaymentStatus::Refunded;
            }
        }
        order.status = change.to;
        order.updated_at = Some(now);
        Ok(change)
    }
}

#[async_trait]
impl AuditLogRepository for FakeShop {
    async fn record(&self, event: &AuditEvent) -> anyhow::Result<()> {
        if self.fail_audit.load(Ordering::SeqCst) {
            anyhow::bail!("audit store offline");
        }
        self.audit.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Approves like the mock gateway, or declines every provider.
pub(crate) struct FakePayments {
    decline: bool,
}

impl FakePayments {
    pub fn approving() -> Self {
        Self { decline: false }
    }

    pub fn declining() -> Self {
        Self { decline: true }
    }
}

#[async_trait]
impl PaymentProcessor for FakePayments {
    async fn process(
        &self,
        _order_id: Uuid,
        amount: Decimal,
        provider: &str,
    ) -> Result<PaymentAttempt, PaymentError> {
        let parsed = PaymentProvider::parse(provider)
            .filter(|_| !self.decline)
            .ok_or_else(|| PaymentError::UnsupportedProvider(provider.to_string()))?;
        let status = match parsed {
            PaymentProvider::Mock => PaymentStatus::Completed,
            PaymentProvider::Stripe | PaymentProvider::PayPal => PaymentStatus::Pending,
        };
        Ok(PaymentAttempt {
            provider: parsed,
            status,
            transaction_id: Some(format!("FAKE-{}", Uuid::new_v4().simple())),
            payment_intent_id: None,
            amount,
        })
    }
}
