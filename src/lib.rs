#![doc = r#"
zaytools — two small utilities behind one typed API.

- **Batch PNG resizing**: every PNG in a folder is stretched to exact target
  dimensions (Lanczos3 by default) and written to a `resized` folder that sits
  next to the input folder.
- **UCI engine probing**: a chess engine (JAR or native executable) is launched,
  sent `uci`, and its startup listing is collected until `uciok`, end of output,
  or a deadline. The engine is always shut down afterwards.

Both power the `zaytools` CLI and can be embedded in your own Rust applications.

Resize a folder
---------------
```rust,no_run
use std::path::Path;

fn main() -> zaytools::Result<()> {
    // Writes to unresized/../resized
    let report = zaytools::resize_images(Path::new("unresized"), 1440, 900)?;
    println!("resized={} failed={}", report.processed, report.errors);
    Ok(())
}
```

With explicit parameters
------------------------
```rust,no_run
use std::path::PathBuf;
use zaytools::{ResampleFilter, ResizeParams, resize_images_with_params};

fn main() -> zaytools::Result<()> {
    let params = ResizeParams {
        input_dir: PathBuf::from("art/raw"),
        width: 512,
        height: 512,
        filter: ResampleFilter::CatmullRom,
    };
    resize_images_with_params(&params)?;
    Ok(())
}
```

Probe an engine
---------------
```rust,no_run
use std::path::Path;
use zaytools::{ProbeOutcome, get_engine_options};

fn main() -> zaytools::Result<()> {
    let probe = get_engine_options(Path::new("Serendipity-1.0.0.jar"))?;
    if probe.outcome == ProbeOutcome::SentinelFound {
        for option in &probe.options {
            println!("{} {:?}", option.name, option.kind);
        }
    }
    Ok(())
}
```

Error handling
--------------
All public functions return `zaytools::Result<T>`; match on `zaytools::Error` to
handle specific cases.

```rust,no_run
use std::path::Path;
use zaytools::{Error, get_engine_options};

fn main() {
    match get_engine_options(Path::new("/missing/engine")) {
        Ok(probe) => println!("{:?}", probe.outcome),
        Err(Error::EngineSpawn { program, source }) => eprintln!("cannot run {program}: {source}"),
        Err(other) => eprintln!("probe failed: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`types`] — shared enums (`ResampleFilter`, `ProbeOutcome`).
- [`core`] — parameters, resampling and UCI parsing primitives.
- [`io`] — PNG codec helpers and the engine child-process guard.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::{ProbeParams, ResizeParams};
pub use crate::core::uci::{EngineId, UciOption, UciOptionKind};
pub use error::{Error, Result};
pub use types::{ProbeOutcome, ResampleFilter};

// Engine plumbing
pub use io::engine::{EngineCommand, EngineProcess, ShutdownReport};

// High-level API re-exports
pub use api::{
    BatchReport, EngineProbe, FileFailure, get_engine_options, get_engine_options_with_params,
    probe_engine, resize_images, resize_images_with_params,
};
