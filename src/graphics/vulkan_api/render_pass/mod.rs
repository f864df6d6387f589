mod color_pass;

pub use self::color_pass::ColorPass;
