//! One screen per console area, keyed by [`ScreenId`].

use std::collections::HashMap;

use stride_core::PageQuery;

use crate::component::Component;
use crate::screen::ScreenId;

pub mod groups;
pub mod members;
pub mod records;
pub mod settings;

pub fn create_screens(default_query: &PageQuery) -> HashMap<ScreenId, Box<dyn Component>> {
    let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
    screens.insert(
        ScreenId::Members,
        Box::new(members::MembersScreen::new(default_query.clone())),
    );
    screens.insert(
        ScreenId::Records,
        Box::new(records::RecordsScreen::new(default_query.clone())),
    );
    screens.insert(
        ScreenId::Groups,
        Box::new(groups::GroupsScreen::new(default_query.clone())),
    );
    screens.insert(
        ScreenId::Settings,
        Box::new(settings::SettingsScreen::new()),
    );
    screens
}
