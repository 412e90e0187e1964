use crate::RgbColor;

// Initially taken from https://github.com/jamesmunns/launch-rs/blob/master/lib/src/color.rs
pub fn find_closest_color_in_palette(color: RgbColor, palette: &[RgbColor]) -> u8 {
    let mut closest_index = 0usize;
    let mut closest_distance = f64::INFINITY;
    for (i, c) in palette.iter().enumerate() {
        if color == *c {
            // Exact match
            return i as u8;
        }
        let distance = (color.r - c.r).powi(2) + (color.g - c.g).powi(2) + (color.b - c.b).powi(2);
        if distance < closest_distance {
            closest_distance = distance;
            closest_index = i;
        }
    }
    closest_index as u8
}
