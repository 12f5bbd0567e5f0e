mod composite;
mod recording;
mod tracing_cb;

pub use composite::CompositeCallback;
pub use recording::RecordingCallback;
pub use tracing_cb::TracingCallback;
