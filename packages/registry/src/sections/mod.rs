//! One module per section type. Each owns a typed data shape and a pure
//! editor; none of them touch network code, ids, ordering or any shared
//! state. Adding a section type means writing one of these modules and
//! one registry entry.

pub mod cta_banner;
pub mod faq;
pub mod feature_grid;
pub mod hero;
pub mod steps;
pub mod testimonials;
