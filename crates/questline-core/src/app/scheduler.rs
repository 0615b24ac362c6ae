//! Scheduler - tick と入力を 1 タスク上で交互に処理するループ
//!
//! # 重要な設計
//! - tick の処理中に次の tick は来ない（MissedTickBehavior::Delay）
//! - 入力行は tick の間に処理され、直後に再描画する
//! - 終了時に一度だけ stats を保存する

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use super::session::{Control, Session};
use super::status::HudFrame;
use crate::ports::Renderer;

/// Why [`Scheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// ユーザーが `exit` を入力した
    Command,
    /// shutdown watch が true になった
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Drive `session` until exit or shutdown.
    ///
    /// - `input` が閉じても（stdin EOF）tick は続ける
    /// - `shutdown` の sender が drop されたら以降は監視しない
    pub async fn run<R>(
        &self,
        session: &mut Session,
        renderer: &mut R,
        mut input: mpsc::Receiver<String>,
        mut shutdown: watch::Receiver<bool>,
    ) -> ExitReason
    where
        R: Renderer + ?Sized,
    {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut input_open = true;
        let mut shutdown_open = true;

        let reason = loop {
            if *shutdown.borrow() {
                break ExitReason::Shutdown;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let frame = session.tick();
                    draw(renderer, &frame);
                }
                line = input.recv(), if input_open => {
                    let Some(line) = line else {
                        tracing::debug!("input closed; ticking continues");
                        input_open = false;
                        continue;
                    };
                    if session.handle_input(&line) == Control::Exit {
                        break ExitReason::Command;
                    }
                    draw(renderer, &session.frame());
                }
                changed = shutdown.changed(), if shutdown_open => {
                    if changed.is_err() {
                        shutdown_open = false;
                    }
                    // 値の判定はループ先頭で行う
                }
            }
        };

        match session.flush() {
            Ok(saved) => tracing::info!(
                quests_done = saved.quests_done,
                seconds_run = saved.seconds_run,
                ?reason,
                "final stats flush"
            ),
            Err(err) => tracing::warn!(error = %err, "final stats flush failed"),
        }

        reason
    }
}

fn draw<R: Renderer + ?Sized>(renderer: &mut R, frame: &HudFrame) {
    if let Err(err) = renderer.render(frame) {
        tracing::warn!(error = %err, "render failed");
    }
}
