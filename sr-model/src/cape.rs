/// Texels per logical cape unit for a cape texture `height` pixels tall.
///
/// Branch order matters: 22-multiples (OptiFine-style 46x22 atlases) win over
/// 17-multiples (bare 22x17 capes), which win over power-of-two sheets.
pub fn cape_scale(height: u32) -> u32 {
    if height % 22 == 0 {
        height / 22
    } else if height % 17 == 0 {
        height / 17
    } else if height.is_power_of_two() && height >= 32 {
        height / 32
    } else {
        (height / 22).max(1)
    }
}
