//! Domínio de encomendas: estados, entidades e payloads

pub mod types;

pub use types::{
    ALL_STATES, Order, OrderCreate, OrderDetail, OrderHistoryEntry, OrderItem, OrderItemInput,
    OrderState, OrderStateChange, OrderStateError, SYSTEM_ACTOR,
};
