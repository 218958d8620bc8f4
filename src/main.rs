//! Tutor - 控制台辅导会话
//!
//! 入口：初始化日志、加载配置并启动会话，然后在 stdin 与快照更新之间循环。
//! 输入 `/quit`、EOF 或 Ctrl+C 退出。

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tutor::core::{create_session, SessionSnapshot, SystemPhase};
use tutor::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let (handle, task) = create_session(config_path);

    let mut watcher = handle.clone();
    let mut printed = 0usize;
    let mut last_phase = handle.phase();
    handle.start().context("Failed to start session")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = watcher.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = watcher.snapshot();
                printed = print_new_messages(&snap, printed);
                if snap.phase != last_phase {
                    last_phase = snap.phase;
                    print_phase(&snap);
                }
            }
            line = lines.next_line() => {
                let line = line.context("Failed to read stdin")?;
                match line.as_deref().map(str::trim) {
                    None | Some("/quit") => break,
                    Some("") => {}
                    Some(text) => {
                        if handle.phase() != SystemPhase::WaitingForParticipant {
                            println!("(busy: {:?}, input ignored)", handle.phase());
                            continue;
                        }
                        handle
                            .submit_participant_input(text)
                            .context("Session closed")?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = handle.shutdown();
    task.await.context("Session task failed")?;
    Ok(())
}

fn print_new_messages(snap: &SessionSnapshot, printed: usize) -> usize {
    for msg in snap.transcript.iter().skip(printed) {
        println!("\n[{}]\n{}", msg.role, msg.body);
    }
    snap.transcript.len()
}

fn print_phase(snap: &SessionSnapshot) {
    match snap.phase {
        SystemPhase::WaitingForParticipant => println!(
            "\n-- mastery {}% | frustration {}% | {:?} --\n> ",
            snap.learner.mastery(),
            snap.learner.frustration(),
            snap.learner.engagement(),
        ),
        SystemPhase::Idle => {
            if let Some(err) = snap.log.iter().rev().find(|e| e.action == "ERROR") {
                println!("\n!! {}", err.detail);
            }
            println!("Session stopped. Type /quit to exit.");
        }
        phase => println!("... {:?}", phase),
    }
}
