/// One filtered observation of the vehicle state.
///
/// Units: seconds, degrees (nose-down negative), metres, m/s and m/s²
/// (vertical axis positive up, so a falling body has negative velocity).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub time_s: f64,
    pub pitch_deg: f64,
    pub altitude_m: f64,
    pub vertical_velocity_mps: f64,
    pub vertical_accel_mps2: f64,
}

impl Sample {
    /// True when every field is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.pitch_deg.is_finite()
            && self.altitude_m.is_finite()
            && self.vertical_velocity_mps.is_finite()
            && self.vertical_accel_mps2.is_finite()
    }
}

/// Adapts any iterator of samples into a `SampleSource`.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Sample>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(samples: T) -> Self {
        Self {
            inner: samples.into_iter(),
        }
    }
}

impl<I> crate::SampleSource for IterSource<I>
where
    I: Iterator<Item = Sample>,
{
    fn next_sample(
        &mut self,
    ) -> Result<Option<Sample>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleSource;

    #[test]
    fn iter_source_drains_in_order() {
        let mut src = IterSource::new(vec![
            Sample {
                time_s: 0.0,
                ..Sample::default()
            },
            Sample {
                time_s: 0.5,
                ..Sample::default()
            },
        ]);
        assert_eq!(src.next_sample().unwrap().map(|s| s.time_s), Some(0.0));
        assert_eq!(src.next_sample().unwrap().map(|s| s.time_s), Some(0.5));
        assert!(src.next_sample().unwrap().is_none());
    }

    #[test]
    fn non_finite_fields_are_detected() {
        let s = Sample {
            altitude_m: f64::NAN,
            ..Sample::default()
        };
        assert!(!s.is_finite());
        assert!(Sample::default().is_finite());
    }
}
