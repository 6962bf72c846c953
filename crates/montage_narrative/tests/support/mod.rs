//! Shared fixtures: a fake tool suite standing in for the renderer,
//! smoother, inspector, benchmark and ffmpeg.
#![allow(dead_code)]

use async_trait::async_trait;
use montage_narrative::{
    GenerationProfile, MontageConfig, PipelineConfig, ProfileCatalog, ToolConfig, ToolsConfig,
};
use montage_process::{ExternalInvoker, Invocation, ProcessOutput, ProcessResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const RENDER: &str = "fake-render";
pub const SMOOTH: &str = "fake-smooth";
pub const INSPECT: &str = "fake-inspect";
pub const BENCH: &str = "fake-bench";
pub const CONCAT: &str = "fake-ffmpeg";

/// Records every invocation and simulates the tools by writing files.
#[derive(Default)]
pub struct FakeInvoker {
    calls: Mutex<Vec<Invocation>>,
    failing_shots: HashSet<String>,
    failing_programs: HashSet<String>,
    vision_status: Option<String>,
    reference_clip: Option<PathBuf>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the renderer exit non-zero for `shot`.
    pub fn failing_shot(mut self, shot: &str) -> Self {
        self.failing_shots.insert(shot.to_string());
        self
    }

    /// Make `program` exit non-zero without writing anything.
    pub fn failing_program(mut self, program: &str) -> Self {
        self.failing_programs.insert(program.to_string());
        self
    }

    /// Status written into vision reports.
    pub fn vision_status(mut self, status: &str) -> Self {
        self.vision_status = Some(status.to_string());
        self
    }

    /// Make the renderer log `clip` as its input and write its own output
    /// under a numbered name without announcing it.
    pub fn reference_clip(mut self, clip: &Path) -> Self {
        self.reference_clip = Some(clip.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program() == program)
            .collect()
    }

    fn render(&self, invocation: &Invocation) -> ProcessOutput {
        let shot = flag(invocation, "--shot-id").unwrap_or("unknown");
        if self.failing_shots.contains(shot) {
            return exit(2, "", "renderer crashed: out of memory");
        }
        let dir = PathBuf::from(flag(invocation, "--output-dir").unwrap_or("."));
        if let Some(clip) = &self.reference_clip {
            std::fs::write(dir.join("render_0001.mp4"), format!("[{shot}]")).unwrap();
            return exit(0, &format!("Loaded reference clip {}\n", clip.display()), "");
        }
        let video = dir.join(format!("{shot}.mp4"));
        std::fs::write(&video, format!("[{shot}]")).unwrap();
        exit(0, &format!("Rendering {shot}\nSaved video to {}\n", video.display()), "")
    }

    fn smooth(&self, invocation: &Invocation) -> ProcessOutput {
        let input = flag(invocation, "--input").unwrap();
        let output = flag(invocation, "--output").unwrap();
        let content = std::fs::read_to_string(input).unwrap();
        std::fs::write(output, format!("{content}~")).unwrap();
        exit(0, "", "")
    }

    fn inspect(&self, invocation: &Invocation) -> ProcessOutput {
        let dir = Path::new(flag(invocation, "--output-dir").unwrap());
        let status = self.vision_status.as_deref().unwrap_or("PASS");
        let report = serde_json::json!({
            "status": status,
            "scores": { "overall": 91.0, "artifacts": 12.0 }
        });
        std::fs::write(dir.join("vision-report.json"), report.to_string()).unwrap();
        // The inspector reports its verdict through its exit code.
        let code = if status == "FAIL" { 1 } else { 0 };
        exit(code, "inspection complete\n", "")
    }

    fn bench(&self, invocation: &Invocation) -> ProcessOutput {
        let dir = Path::new(flag(invocation, "--output-dir").unwrap());
        let report = serde_json::json!({
            "temporal_coherence": {
                "flicker_frames": 1,
                "jitter_score": 4.5,
                "identity_score": 88.0
            },
            "overall_quality": 80.0
        });
        let path = dir.join("benchmark.json");
        std::fs::write(&path, report.to_string()).unwrap();
        exit(0, &format!("report: {}\n", path.display()), "")
    }

    fn concat(&self, invocation: &Invocation) -> ProcessOutput {
        let args = invocation.args();
        let list = args
            .iter()
            .position(|a| a == "-i")
            .and_then(|i| args.get(i + 1))
            .unwrap();
        let output = args.last().unwrap();
        let mut joined = String::new();
        for line in std::fs::read_to_string(list).unwrap().lines() {
            let quoted = line.trim_start_matches("file '").trim_end_matches('\'');
            let path = quoted.replace(r"'\''", "'");
            joined.push_str(&std::fs::read_to_string(path).unwrap());
        }
        std::fs::write(output, joined).unwrap();
        exit(0, "", "")
    }
}

#[async_trait]
impl ExternalInvoker for FakeInvoker {
    async fn run(&self, invocation: &Invocation) -> ProcessResult<ProcessOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        if self.failing_programs.contains(invocation.program()) {
            return Ok(exit(1, "", "simulated failure"));
        }
        let output = match invocation.program().as_str() {
            RENDER => self.render(invocation),
            SMOOTH => self.smooth(invocation),
            INSPECT => self.inspect(invocation),
            BENCH => self.bench(invocation),
            CONCAT => self.concat(invocation),
            other => panic!("unexpected program {other}"),
        };
        Ok(output)
    }
}

fn exit(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
    ProcessOutput::new(Some(code), stdout, stderr, Duration::from_millis(1))
}

/// Value following `name` in the argument list.
pub fn flag<'a>(invocation: &'a Invocation, name: &str) -> Option<&'a str> {
    let args = invocation.args();
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

pub fn tools() -> ToolsConfig {
    ToolsConfig::new(
        ToolConfig::new(RENDER),
        ToolConfig::new(SMOOTH),
        ToolConfig::new(INSPECT),
        ToolConfig::new(BENCH),
        ToolConfig::new(CONCAT),
    )
}

pub fn config(root: &Path) -> MontageConfig {
    MontageConfig::builder()
        .tools(tools())
        .pipeline(PipelineConfig::new(0, false))
        .build()
        .unwrap()
        .with_output_root(root)
}

/// `dolly` recommends smoothing, `static` does not.
pub fn profiles() -> ProfileCatalog {
    ProfileCatalog::new()
        .with(GenerationProfile::new("dolly").recommending_smoothing(true))
        .with(GenerationProfile::new("static"))
}
