//! Instrumented application services behind the HTTP routes.

pub mod jobs;
pub mod orders;
pub mod users;

pub use jobs::spawn_order_sweeper;
pub use orders::{spawn_order_consumer, Order, OrderPublisher, ORDERS_TOPIC};
pub use users::{User, UserRepository};
