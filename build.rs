use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Error, Result};

/// One GLSL source and the SPIR-V file it compiles to.
struct ShaderJob {
    source: PathBuf,
    output: PathBuf,
}

impl ShaderJob {
    /// The output sits next to the source with `.spv` appended, so
    /// `triangle.vert` becomes `triangle.vert.spv`.
    fn for_source(source: &Path) -> Result<Self> {
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| {
                format!("Unable to get the file name for shader {:?}", source)
            })?;
        Ok(Self {
            source: source.to_owned(),
            output: source.with_file_name(format!("{}.spv", file_name)),
        })
    }

    /// True when the output is missing or older than the source.
    fn is_stale(&self) -> Result<bool> {
        if !self.output.try_exists()? {
            return Ok(true);
        }
        let source_modified = std::fs::metadata(&self.source)?.modified()?;
        let output_modified = std::fs::metadata(&self.output)?.modified()?;
        Ok(source_modified > output_modified)
    }

    fn compile(&self) -> Result<()> {
        println!("cargo:rerun-if-changed={}", self.source.display());
        if !self.is_stale().unwrap_or(true) {
            return Ok(());
        }

        let output = Command::new("glslc")
            .arg(&self.source)
            .arg("-o")
            .arg(&self.output)
            .arg("--target-env=vulkan1.0")
            .output()
            .with_context(|| {
                format!("Unable to run glslc for {}", self.source.display())
            })?;

        if !output.status.success() {
            eprintln!("{}", String::from_utf8_lossy(&output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            return Err(Error::msg(format!(
                "glslc rejected the shader at {:?}",
                self.source
            )));
        }

        println!(
            "cargo:warning=compiled {} -> {}",
            self.source.display(),
            self.output.display()
        );
        Ok(())
    }
}

/// True when `glslc` can be launched from this build environment.
fn glslc_available() -> bool {
    Command::new("glslc")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=shaders");

    if !glslc_available() {
        println!(
            "cargo:warning=glslc not found, shaders/*.spv must be provided \
             before running the demo"
        );
        return Ok(());
    }

    let sources =
        glob::glob("shaders/*.vert")?.chain(glob::glob("shaders/*.frag")?);
    for source in sources {
        ShaderJob::for_source(&source?)?.compile()?;
    }

    Ok(())
}
