fn main() -> iced::Result {
    spotter::gui::run()
}
