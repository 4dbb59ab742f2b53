#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PopupPlacement {
    Top,
    Bottom,
}

/// A rectangle in window coordinates, y growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where a dropdown popup goes relative to its trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupLayout {
    pub placement: PopupPlacement,
    pub top: f32,
    pub left: f32,
    pub width: f32,
}

/// Places the popup below the trigger, matching its width. It flips above
/// when the space below is short of `preferred_height` and there is more
/// room above.
pub fn popup_placement(trigger: Rect, viewport: Rect, preferred_height: f32) -> PopupLayout {
    let space_above = (trigger.y - viewport.y).max(0.0);
    let space_below = (viewport.bottom() - trigger.bottom()).max(0.0);
    let upward = space_below < preferred_height && space_above > space_below;

    if upward {
        PopupLayout {
            placement: PopupPlacement::Top,
            top: trigger.y - preferred_height.min(space_above),
            left: trigger.x,
            width: trigger.width,
        }
    } else {
        PopupLayout {
            placement: PopupPlacement::Bottom,
            top: trigger.bottom(),
            left: trigger.x,
            width: trigger.width,
        }
    }
}
