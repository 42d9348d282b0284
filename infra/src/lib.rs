pub mod endpoints;
pub mod file_store;
pub mod http_gateway;
pub mod memory_store;
pub mod navigation;
mod wire;

pub use endpoints::ApiEndpoints;
pub use file_store::FileKeyValueStore;
pub use http_gateway::{HttpBackendGateway, HttpGatewayConfig};
pub use memory_store::MemoryKeyValueStore;
pub use navigation::ChannelNavigator;
