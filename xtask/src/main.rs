//! 工作区开发任务
//!
//! `cargo run -p xtask -- <任务>`，所有命令都在工作区根目录执行。

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use qrtransfer_core::{RoleSelector, SelectionWiring};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use xshell::{Shell, cmd};

const PACKAGES: [&str; 2] = ["qrtransfer-core", "qrtransfer-tui"];
const DEFAULT_LOG_FILE: &str = "/tmp/qrtransfer.log";

#[derive(Parser)]
#[command(name = "xtask", about = "QR Transfer 工作区任务")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// release 构建库和 TUI
    Build,
    /// 格式检查 + clippy
    Lint,
    /// 启动 TUI，日志追加到文件
    Tui {
        /// RUST_LOG 过滤规则
        #[arg(short, long, default_value = "debug")]
        filter: String,
        /// 日志文件
        #[arg(short = 'o', long, default_value = DEFAULT_LOG_FILE)]
        log_file: PathBuf,
        /// 以已连接模式启动
        #[arg(long)]
        wired: bool,
    },
    /// 打印选择器渲染出的 HTML
    Preview {
        /// 以已连接模式渲染
        #[arg(long)]
        wired: bool,
        /// 渲染前依次触发的选项值，例如 `--pick 1`
        #[arg(long)]
        pick: Vec<String>,
    },
    /// 运行测试
    Test {
        /// 只测试核心库
        #[arg(long)]
        core: bool,
    },
    /// 覆盖率报告 (需要 cargo-tarpaulin)
    Coverage,
    /// cargo clean
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(workspace_root());

    match cli.task {
        Task::Build => {
            let packages = package_args();
            cmd!(sh, "cargo build --release {packages...}").run()?;
        }
        Task::Lint => {
            cmd!(sh, "cargo fmt --all -- --check").run()?;
            cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
        }
        Task::Tui {
            filter,
            log_file,
            wired,
        } => run_tui(&filter, &log_file, wired)?,
        Task::Preview { wired, pick } => preview(wired, &pick),
        Task::Test { core } => {
            if core {
                cmd!(sh, "cargo test -p qrtransfer-core").run()?;
            } else {
                cmd!(sh, "cargo test --workspace").run()?;
            }
        }
        Task::Coverage => coverage(&sh)?,
        Task::Clean => cmd!(sh, "cargo clean").run()?,
    }

    Ok(())
}

fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap_or_else(|| Path::new("."))
}

fn package_args() -> Vec<String> {
    PACKAGES.iter().map(|p| format!("--package={p}")).collect()
}

/// TUI 占用终端，stderr 只能写到文件里
fn run_tui(filter: &str, log_file: &Path, wired: bool) -> Result<()> {
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("无法打开日志文件 {}", log_file.display()))?;

    println!("日志: {} (RUST_LOG={filter})", log_file.display());
    println!("查看: tail -f {}", log_file.display());

    let mut command = Command::new("cargo");
    command
        .current_dir(workspace_root())
        .args(["run", "-p", "qrtransfer-tui", "--"])
        .env("RUST_LOG", filter)
        .stderr(Stdio::from(log));
    if wired {
        command.arg("--wired");
    }

    let status = command.status().context("无法启动 cargo")?;
    if !status.success() {
        bail!("qrtransfer-tui 退出: {status}");
    }
    Ok(())
}

fn preview(wired: bool, picks: &[String]) {
    let wiring = if wired {
        SelectionWiring::Wired
    } else {
        SelectionWiring::DisplayOnly
    };
    let mut selector = RoleSelector::with_wiring(wiring);
    for value in picks {
        let role = selector.on_option_value_changed(value);
        println!("pick {value:?} -> {role}");
    }

    println!("[{}] 当前角色: {}", wiring.name(), selector.current_role());
    println!("{}", selector.render());
}

fn coverage(sh: &Shell) -> Result<()> {
    if cmd!(sh, "cargo tarpaulin --version").quiet().read().is_err() {
        bail!("未找到 cargo-tarpaulin，先执行 `cargo install cargo-tarpaulin`");
    }

    let packages = package_args();
    cmd!(
        sh,
        "cargo tarpaulin {packages...} --out Html --output-dir target/coverage"
    )
    .run()?;
    println!("报告: target/coverage/tarpaulin-report.html");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_args_cover_both_crates() {
        assert_eq!(
            package_args(),
            vec!["--package=qrtransfer-core", "--package=qrtransfer-tui"]
        );
    }

    #[test]
    fn test_preview_accepts_repeated_picks() {
        let cli = Cli::try_parse_from(["xtask", "preview", "--wired", "--pick", "0", "--pick", "1"])
            .unwrap();
        let Task::Preview { wired, pick } = cli.task else {
            panic!("expected preview task");
        };
        assert!(wired);
        assert_eq!(pick, vec!["0", "1"]);
    }

    #[test]
    fn test_workspace_root_holds_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
        assert!(workspace_root().join("crates/qrtransfer-core").is_dir());
    }
}
