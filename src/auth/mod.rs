// Token validation against the external identity provider. The provider
// itself (registration, login, sessions) lives outside this service.

pub mod jwt;

pub use jwt::{Claims, JwtService};
