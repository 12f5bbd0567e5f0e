mod scripted;
pub use scripted::ScriptedChatModel;

mod backend;
pub use backend::{FakeBackend, HttpBackend, ProviderBackend, ProviderRequest, ProviderResponse};

mod structured_output;
pub use structured_output::StructuredOutputChatModel;
