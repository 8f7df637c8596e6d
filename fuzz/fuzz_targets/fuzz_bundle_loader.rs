#![no_main]
use libfuzzer_sys::fuzz_target;
use soc_core::{NeuralPredictor, ParameterBundle, PredictorCfg};
use std::sync::Arc;

fuzz_target!(|data: &str| {
    let Ok(params) = soc_config::parse_model_params(data) else {
        return;
    };
    let Ok(bundle) = ParameterBundle::try_from(&params) else {
        return;
    };
    // Any accepted bundle must give bounded estimates for finite inputs.
    let p = NeuralPredictor::new(Arc::new(bundle), 96, PredictorCfg::default());
    for (i, t, v) in [(0.0, 25.0, 350.0), (-1e6, -1e6, -1e6), (1e6, 1e6, 1e6)] {
        let soc = p.predict_one(i, t, v);
        assert!((0.0..=100.0).contains(&soc), "soc out of range: {soc}");
    }
});
