use super::*;

mod actions;
mod dom;
mod events;
mod html;
mod page;
mod timers;

pub(crate) use html::parse_html;
