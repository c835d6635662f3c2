//! Runtime detection of the vector instruction sets used by the counting pass and the ghost
//! counter bank. Detection runs once per process.

use log::debug;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CpuFeatures {
    pub avx2: bool,
    pub avx512f: bool,
}

impl CpuFeatures {
    fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = Self {
            avx2: false,
            avx512f: false,
        };

        #[cfg(target_arch = "x86_64")]
        {
            features.avx2 = is_x86_feature_detected!("avx2");
            features.avx512f = is_x86_feature_detected!("avx512f");
        }

        features
    }

    fn ghost_bank(&self) -> &'static str {
        match (self.avx2, self.avx512f) {
            (true, true) => "avx2 8 lanes, avx512f 16 lanes",
            (true, false) => "avx2 8 lanes, portable 16 lanes",
            (false, true) => "avx512f 16 lanes",
            (false, false) => "portable 16 lanes",
        }
    }
}

pub fn cpu_features() -> CpuFeatures {
    static FEATURES: OnceCell<CpuFeatures> = OnceCell::new();

    *FEATURES.get_or_init(|| {
        let features = CpuFeatures::detect();
        debug!(
            "acarp: counting pass {}, ghost bank {}",
            if features.avx2 { "avx2 x4" } else { "scalar" },
            features.ghost_bank(),
        );
        features
    })
}
