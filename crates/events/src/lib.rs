//! Domain events and their delivery mechanics.
//!
//! Two delivery paths are provided:
//!
//! - [`EventDispatcher`]: synchronous listener registry. Listeners register at
//!   start-up and run to completion before `dispatch` returns.
//! - [`EventBus`]: pub/sub fan-out to background consumers (see
//!   [`InMemoryEventBus`] and [`BusPublisher`]).

pub mod bus;
pub mod dispatcher;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;
pub mod recorder;

pub use bus::{BusPublisher, EventBus, Subscription};
pub use dispatcher::{DispatchReport, EventDispatcher, EventListener, ListenerError};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use recorder::EventRecorder;
