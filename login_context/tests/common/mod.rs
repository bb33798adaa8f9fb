pub mod fixtures;
pub mod mock_identity_server;

pub use fixtures::*;
pub use mock_identity_server::MockIdentityServer;
