/// Router Module Index
///
/// Splits the endpoints by the guard they sit behind. Access control is applied per
/// module with Axum layers in `create_router`, so a handler cannot end up unguarded
/// by being registered in the wrong place.

/// Routes open to anonymous visitors: catalog reads, the order form, content
/// documents, login/logout and first-admin registration.
pub mod public;

/// Routes behind the API flavour of the Session Guard (401 without a session).
pub mod authenticated;

/// The admin UI tree, behind the page flavour of the Session Guard.
pub mod admin;
