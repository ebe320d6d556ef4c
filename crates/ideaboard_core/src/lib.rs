pub mod domain;
pub mod memory;
pub mod ports;
pub mod services;

pub use domain::{
    AnalyticsEvent, AuthSession, Canvas, CanvasConnection, CanvasGraph, CanvasNode, Category,
    DataEnvelope, EventCount, Idea, MessageEnvelope, Task, TaskStatus, User, UserCredentials,
};
pub use memory::InMemoryDatabase;
pub use ports::{DatabaseService, PortError, PortResult};
