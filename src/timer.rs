use std::time::Instant;

/// Stopwatch for startup phase logging.
pub struct Timer{
    start: Instant,
    mark: u128,
}

impl Timer{
    pub fn new() -> Self{
        Self{ start: Instant::now(), mark: 0 }
    }

    /// Milliseconds since the previous lap, restarting the count.
    pub fn lap(&mut self) -> u128{
        let now = self.start.elapsed().as_millis();
        let ms = now - self.mark;
        self.mark = now;
        ms
    }

    pub fn total(&self) -> u128{
        self.start.elapsed().as_millis()
    }
}

#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn test_lap_restarts(){
        let mut timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.lap() >= 5);
        assert!(timer.lap() < 5);
        assert!(timer.total() >= 5);
    }
}
