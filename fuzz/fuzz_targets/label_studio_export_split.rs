//! Fuzz target for Label Studio export parsing and splitting.

#![no_main]

use evalview::labelstudio::split::{from_export_str, split_tasks, SplitOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(tasks) = from_export_str(json) {
        let _ = split_tasks(&tasks, &SplitOptions::default());
    }
});
