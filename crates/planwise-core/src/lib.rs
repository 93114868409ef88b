mod dispatch;
mod events;
mod factory;
mod outcome;
mod profile;
mod prompts;
mod runner;
mod session;
pub mod analysis;

pub use dispatch::Dispatcher;
pub use events::{Content, EventActions, Part, TurnEvent};
pub use factory::{BuiltSession, SessionFactory};
pub use outcome::{OutcomeKind, TurnOutcome, NO_FINAL_RESPONSE, NO_SPECIFIC_MESSAGE};
pub use profile::{AgentProfile, ProfileKind};
pub use prompts::{EVENT_PROMPT, REFLECTION_PROMPT};
pub use runner::{AgentRuntime, EventStream, Runner};
pub use session::{InMemorySessionService, Session, SessionError, SessionKey};
