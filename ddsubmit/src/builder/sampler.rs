// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[cfg(feature = "sample-rate")]
pub(crate) use rng::Sampler;

#[cfg(not(feature = "sample-rate"))]
pub(crate) use noop::Sampler;

pub(crate) trait Sampling {
    fn new_with_rate(rate: f32) -> Self;
    fn sample<T>(&self, item: T) -> Option<T>;
}

/// Emits everything; the agent still scales by the rate written to the datagram.
#[cfg(not(feature = "sample-rate"))]
mod noop {
    use super::Sampling;

    pub struct Sampler;

    impl Sampling for Sampler {
        fn new_with_rate(_rate: f32) -> Self {
            Self
        }

        fn sample<T>(&self, item: T) -> Option<T> {
            Some(item)
        }
    }
}

#[cfg(feature = "sample-rate")]
mod rng {
    use super::Sampling;
    use rand::Rng;

    pub struct Sampler(f64);

    impl Sampling for Sampler {
        fn new_with_rate(rate: f32) -> Self {
            Self(f64::from(rate).clamp(0.0, 1.0))
        }

        fn sample<T>(&self, item: T) -> Option<T> {
            if rand::thread_rng().gen_bool(self.0) {
                Some(item)
            } else {
                None
            }
        }
    }
}

#[cfg(all(test, feature = "sample-rate"))]
mod tests {
    use super::{Sampler, Sampling};

    #[test]
    fn test_sampler_always_keeps_full_rate() {
        let sampler = Sampler::new_with_rate(1.0);
        for i in 0..100 {
            assert_eq!(Some(i), sampler.sample(i));
        }
    }
}
