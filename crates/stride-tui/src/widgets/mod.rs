//! Small reusable UI pieces shared by the screens.

pub mod form;
pub mod pager;
