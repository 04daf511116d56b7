mod decode;
mod har;
mod providers;
mod stream;

pub use decode::run_decode;
pub use har::run_har;
pub use providers::run_providers;
pub use stream::run_stream;
