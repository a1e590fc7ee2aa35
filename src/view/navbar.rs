const NAVBAR_HTML: &str = include_str!("../../res/templates/navbar.html");

pub struct Navbar;

impl Navbar {
    pub fn render() -> &'static str {
        NAVBAR_HTML
    }
}
