//! Screen implementations.
//!
//! Each screen is a [`Component`](crate::component::Component) registered
//! with the app under its [`ScreenId`](crate::screen::ScreenId).

mod coming_soon;
mod dashboard;
mod sign_in;
mod todays_books;

pub use coming_soon::ComingSoonScreen;
pub use dashboard::DashboardScreen;
pub use sign_in::SignInScreen;
pub use todays_books::TodaysBooksScreen;

use std::collections::HashMap;

use crate::component::Component;
use crate::screen::ScreenId;

/// Build every screen, keyed by its id.
pub fn create_screens() -> HashMap<ScreenId, Box<dyn Component>> {
    let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
    screens.insert(ScreenId::Dashboard, Box::new(DashboardScreen::new()));
    screens.insert(ScreenId::TodaysBooks, Box::new(TodaysBooksScreen::new()));
    screens.insert(ScreenId::ComingSoon, Box::new(ComingSoonScreen::new()));
    screens.insert(ScreenId::SignIn, Box::new(SignInScreen::new()));
    screens
}
