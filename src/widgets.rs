pub mod button;
pub mod checkbox;
pub mod choice;
pub mod grid;
pub mod label;
pub mod overlay;
pub mod pbar;
pub mod pixmap;
pub mod scroll;
pub mod slider;
pub mod spinner;
pub mod switch;
pub mod table;
pub mod tabs;
pub mod textbox;

pub use button::Button;
pub use checkbox::Checkbox;
pub use choice::Choice;
pub use grid::Grid;
pub use label::Label;
pub use overlay::Overlay;
pub use pbar::ProgressBar;
pub use pixmap::PixmapArea;
pub use scroll::ScrollArea;
pub use slider::Slider;
pub use spinner::Spinner;
pub use switch::Switch;
pub use table::Table;
pub use tabs::Tabs;
pub use textbox::TextBox;
