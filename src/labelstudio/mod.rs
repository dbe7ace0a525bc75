//! Label Studio pipeline stages around the viewer.
//!
//! - [`prepare`]: markdown sources to import tasks, before annotation
//! - [`split`]: a project export to one evaluation document per task,
//!   after annotation

pub mod prepare;
pub mod split;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::error::EvalviewError;

/// Writes `value` as pretty-printed JSON.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EvalviewError> {
    let file = File::create(path).map_err(EvalviewError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(|source| EvalviewError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}
