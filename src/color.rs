use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

macro_rules! get_version {
    ($file:expr) => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " ",
            include_str!(concat!(env!("OUT_DIR"), "/", $file))
        )
    };
}

pub fn set_fg(stdout: &mut StandardStream, color: Color) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_intense(true));
}
pub fn reset_fg(stdout: &mut StandardStream) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(None).set_intense(true));
}

/// Colour of a rank tier's css class, as drawn on the site.
pub fn rank_color(color_class: Option<&str>) -> Option<Color> {
    match color_class? {
        "user-gray" => Some(Color::White),
        "user-green" => Some(Color::Green),
        "user-cyan" => Some(Color::Cyan),
        "user-blue" => Some(Color::Blue),
        "user-violet" => Some(Color::Magenta),
        "user-orange" => Some(Color::Yellow),
        "user-red" | "user-legendary" | "user-4000" => Some(Color::Red),
        _ => None,
    }
}

macro_rules! write_color {
    ($dest:expr, $color:expr, $typ:expr, $($arg:tt)*) => {{
        $crate::color::set_fg($dest, $color);
        let _ = write!($dest, "{:>9}: ", $typ);
        $crate::color::reset_fg($dest);
        let _ = writeln!($dest, $($arg)*);
    }};
}

macro_rules! write_error {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Red, $typ, $($arg)*)
    };
}

macro_rules! write_info {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Blue, $typ, $($arg)*)
    };
}

macro_rules! write_ok {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Green, $typ, $($arg)*)
    };
}

macro_rules! write_warn {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Yellow, $typ, $($arg)*)
    };
}
