use glam::UVec2;

use crate::error::ResolutionError;

/// Ratio of the longer display side to the shorter one. Always `>= 1`.
pub fn aspect_ratio(display: UVec2) -> Result<f32, ResolutionError> {
    if display.x == 0 || display.y == 0 {
        return Err(ResolutionError::EmptyDisplay { width: display.x, height: display.y });
    }

    Ok(display.max_element() as f32 / display.min_element() as f32)
}

/// Derives the size of a grid from a target resolution and the display size.
///
/// The shorter grid axis gets `resolution` cells and the longer one
/// `resolution × aspect_ratio`, oriented like the display.
pub fn grid_size(display: UVec2, resolution: u32) -> Result<UVec2, ResolutionError> {
    if resolution == 0 {
        return Err(ResolutionError::ZeroResolution);
    }

    let aspect = aspect_ratio(display)?;
    let long = (resolution as f32 * aspect) as u32;
    let short = resolution;

    if display.x > display.y {
        Ok(UVec2::new(long, short))
    } else {
        Ok(UVec2::new(short, long))
    }
}
