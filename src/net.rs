mod response;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use response::Response;
pub use transport::{HttpTransport, Transport};
