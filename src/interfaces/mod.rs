//! Adapters between the core and its transports: the redirect form handed
//! to the buyer's browser and the form-encoded ITN post.

pub mod form;
pub mod html;
