use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Time-windowed buffer of (timestamp, amplitude) points for one channel.
/// Points older than the window are pruned on append.
#[derive(Debug)]
pub struct RollingBuffer {
    window: Duration,
    points: VecDeque<(Instant, f64)>,
}

impl RollingBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            points: VecDeque::new(),
        }
    }

    pub fn append(&mut self, timestamp: Instant, amplitude: f64) {
        self.points.push_back((timestamp, amplitude));
        while let Some(&(oldest, _)) = self.points.front() {
            if oldest + self.window < timestamp {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Instant, f64)> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<(Instant, f64)> {
        self.points.back().copied()
    }
}

/// Per-channel visualization state: the rolling buffer plus the most recent
/// amplitude, kept for the readout next to each chart
#[derive(Debug)]
pub struct ChannelState {
    last_value: Option<f64>,
    buffer: RollingBuffer,
}

impl ChannelState {
    pub fn new(window: Duration) -> Self {
        Self {
            last_value: None,
            buffer: RollingBuffer::new(window),
        }
    }

    pub fn append(&mut self, timestamp: Instant, amplitude: f64) {
        self.buffer.append(timestamp, amplitude);
        self.last_value = Some(amplitude);
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    /// Most recent amplitude formatted to two decimals
    pub fn last_value_formatted(&self) -> Option<String> {
        self.last_value.map(|v| format!("{v:.2}"))
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_prune() {
        let mut buffer = RollingBuffer::new(Duration::from_secs(2));
        let t0 = Instant::now();

        buffer.append(t0, 1.0);
        buffer.append(t0 + Duration::from_secs(1), 2.0);
        assert_eq!(buffer.len(), 2);

        // First point falls outside the 2s window, second survives
        buffer.append(t0 + Duration::from_millis(2500), 3.0);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.latest().unwrap().1, 3.0);
    }

    #[test]
    fn test_channel_state_last_value() {
        let mut state = ChannelState::new(Duration::from_secs(1));
        assert!(state.last_value().is_none());
        assert!(state.last_value_formatted().is_none());

        state.append(Instant::now(), 3.14159);
        assert_eq!(state.last_value(), Some(3.14159));
        assert_eq!(state.last_value_formatted().unwrap(), "3.14");
        assert_eq!(state.buffer().len(), 1);
    }
}
