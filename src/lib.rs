// Module layout (Clean Architecture style)
// - bootstrap: configuration and service wiring
// - infrastructure: Postgres adapters, migrations, seed data, mock payments
// - presentation: HTTP handlers and routing
// - application: ports, use cases, access policies and shared services
// - domain: core models and rules (catalog, carts, orders, payments)

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
