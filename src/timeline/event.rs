/// A discrete notification raised by [`super::TimelineDriver::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// The computed waypoint index changed to `index`, which is not the
    /// final waypoint. Fires in both directions.
    WaypointCrossed { index: usize },
    /// The computed waypoint index changed to the final waypoint.
    JourneyComplete { index: usize },
    /// Progress moved into the terminal warp band.
    ThresholdEntered,
    /// Progress left the terminal warp band.
    ThresholdExited,
}

impl TimelineEvent {
    /// The waypoint index carried by crossing-family events.
    #[must_use]
    pub fn waypoint_index(&self) -> Option<usize> {
        match self {
            Self::WaypointCrossed { index } | Self::JourneyComplete { index } => Some(*index),
            Self::ThresholdEntered | Self::ThresholdExited => None,
        }
    }
}
