pub mod sample;

pub use sample::{IterSource, Sample};

/// Producer of ordered, already-filtered samples (file replay, simulator, live bus).
pub trait SampleSource {
    /// Next sample in timestamp order, or `None` once the stream is exhausted.
    fn next_sample(&mut self) -> Result<Option<Sample>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Consumer of the one-shot deployment decision (parachute release, pyro channel, ...).
pub trait DeploymentActuator {
    fn deploy(&mut self, time_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_sample(&mut self) -> Result<Option<Sample>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_sample()
    }
}

impl<A: DeploymentActuator + ?Sized> DeploymentActuator for Box<A> {
    fn deploy(&mut self, time_s: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).deploy(time_s)
    }
}
