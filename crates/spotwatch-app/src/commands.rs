//! 대화형 명령 (headless).
//!
//! 표준 입력 한 줄이 명령 하나다:
//! - `q` 종료
//! - `w` / `s` 빈 자리 목록 위/아래 스크롤
//! - `click <x> <y>` 표시 영상 좌표로 주차면 선택
//! - `list <y>` 빈 자리 목록 좌표로 주차면 선택
//! - `status <id>` 주차면 상태 조회
//!
//! 입력 스레드는 파싱만 하고 채널로 넘긴다. 상태 변경은 모니터링 루프가
//! 프레임 사이에 [`InteractionController::apply`]로 수행한다.

use spotwatch_core::error::CoreError;
use spotwatch_core::models::interaction::InteractionState;
use spotwatch_core::models::spot::SpotId;
use spotwatch_core::selection::{ListLayout, OverlayMapper};
use spotwatch_vision::engine::OccupancyEngine;
use std::io::BufRead;
use std::str::FromStr;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 사용자 명령
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ScrollUp,
    ScrollDown,
    /// 표시 영상 좌표 클릭
    Click { x: f64, y: f64 },
    /// 빈 자리 목록 클릭 (y 좌표)
    ListClick { y: i64 },
    Status(SpotId),
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CoreError::validation("command", "빈 명령"))?
            .to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("q" | "quit", []) => Command::Quit,
            ("w" | "up", []) => Command::ScrollUp,
            ("s" | "down", []) => Command::ScrollDown,
            ("click", [x, y]) => Command::Click {
                x: parse_arg(x, "x")?,
                y: parse_arg(y, "y")?,
            },
            ("list", [y]) => Command::ListClick {
                y: parse_arg(y, "y")?,
            },
            ("status", [id]) => Command::Status(parse_arg(id, "id")?),
            _ => {
                return Err(CoreError::validation(
                    "command",
                    format!("알 수 없는 명령: {line:?}"),
                ))
            }
        };
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(raw: &str, field: &str) -> Result<T, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::validation(field, format!("숫자가 아님: {raw:?}")))
}

/// 명령 적용 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// 선택/스크롤 상태 소유자
pub struct InteractionController {
    state: InteractionState,
    mapper: OverlayMapper,
    list: ListLayout,
}

impl InteractionController {
    pub fn new(mapper: OverlayMapper, list: ListLayout) -> Self {
        Self {
            state: InteractionState::new(),
            mapper,
            list,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// 현재 목록 표시 구간
    pub fn visible_rows<'a>(&self, vacant_ids: &'a [SpotId]) -> &'a [SpotId] {
        self.list.visible(&self.state, vacant_ids)
    }

    /// 빈 자리 목록이 줄었을 때 스크롤 위치 보정
    pub fn sync(&mut self, vacant_len: usize) {
        self.list.clamp_scroll(&mut self.state, vacant_len);
    }

    /// 명령 하나 적용
    pub fn apply(&mut self, command: Command, engine: &OccupancyEngine) -> CommandOutcome {
        match command {
            Command::Quit => return CommandOutcome::Quit,
            Command::ScrollUp => self.list.scroll_up(&mut self.state),
            Command::ScrollDown => {
                let vacant_len = engine.vacant_ids().len();
                self.list.scroll_down(&mut self.state, vacant_len);
            }
            Command::Click { x, y } => {
                let hit = self.mapper.select(engine.spots(), x, y);
                self.state.select(hit);
                match hit {
                    Some(id) => info!("주차면 {id} 선택 (오버레이 {x}, {y})"),
                    None => debug!("오버레이 ({x}, {y}) 에 주차면 없음"),
                }
            }
            Command::ListClick { y } => {
                let vacant_ids = engine.vacant_ids();
                let hit = self.list.select(&self.state, &vacant_ids, y);
                self.state.select(hit);
                match hit {
                    Some(id) => info!("주차면 {id} 선택 (목록 y={y})"),
                    None => debug!("목록 y={y} 에 항목 없음"),
                }
            }
            Command::Status(id) => match engine.status_of(id) {
                Some(status) => info!("주차면 {id}: {status:?}"),
                None => info!("주차면 {id}: 알 수 없음"),
            },
        }
        debug!(
            "상호작용 상태: 선택={:?}, 스크롤={}",
            self.state.selected, self.state.scroll_index
        );
        CommandOutcome::Continue
    }
}

/// 줄 단위 입력을 명령으로 바꿔 채널로 넘긴다. 넘긴 명령 수 반환
///
/// 수신 측이 닫히면 즉시 멈춘다.
pub fn forward_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<Command>) -> usize {
    let mut forwarded = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("입력 읽기 실패: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if tx.blocking_send(command).is_err() {
                    break;
                }
                forwarded += 1;
            }
            Err(e) => warn!("명령 무시: {e}"),
        }
    }
    forwarded
}

/// 표준 입력 리더 스레드 시작
///
/// 블로킹 stdin 읽기가 런타임 종료를 막지 않도록 분리된 OS 스레드에서 돈다.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Command>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("spotwatch-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            let count = forward_commands(stdin.lock(), &tx);
            debug!("표준 입력 종료 (명령 {count}개)");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use spotwatch_core::config::EngineConfig;
    use spotwatch_core::models::occupancy::Occupancy;
    use spotwatch_core::models::spot::{BoundingBox, Spot};
    use spotwatch_core::ports::classifier::OccupancyClassifier;
    use spotwatch_core::ports::snapshot::SnapshotSink;
    use std::io::Cursor;

    struct AlwaysVacant;

    impl OccupancyClassifier for AlwaysVacant {
        fn classify(&self, _region: &RgbImage) -> Result<Occupancy, CoreError> {
            Ok(Occupancy::Vacant)
        }

        fn name(&self) -> &str {
            "always-vacant"
        }
    }

    struct NullSink;

    impl SnapshotSink for NullSink {
        fn write_vacant(&mut self, _vacant_ids: &[SpotId]) -> Result<(), CoreError> {
            Ok(())
        }
    }

    /// 10x10 주차면 30개 (가로 6 x 세로 5), 100x100 프레임
    fn engine_with_vacant_spots() -> OccupancyEngine {
        let spots = (0..30u32)
            .map(|i| Spot::new(i + 1, BoundingBox::new((i % 6) * 15, (i / 6) * 15, 10, 10)))
            .collect();
        let mut engine = OccupancyEngine::new(
            spots,
            (100, 100),
            &EngineConfig::default(),
            Box::new(AlwaysVacant),
            Box::new(NullSink),
        )
        .unwrap();
        engine
            .process_frame(RgbImage::from_pixel(100, 100, Rgb([0, 0, 0])))
            .unwrap();
        engine
    }

    fn controller() -> InteractionController {
        InteractionController::new(
            OverlayMapper::new((100, 100), (200, 200)).unwrap(),
            ListLayout::new(20, 20, 30).unwrap(),
        )
    }

    #[test]
    fn parse_commands() {
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(" W ".parse::<Command>().unwrap(), Command::ScrollUp);
        assert_eq!("s".parse::<Command>().unwrap(), Command::ScrollDown);
        assert_eq!(
            "click 12.5 40".parse::<Command>().unwrap(),
            Command::Click { x: 12.5, y: 40.0 }
        );
        assert_eq!(
            "list -5".parse::<Command>().unwrap(),
            Command::ListClick { y: -5 }
        );
        assert_eq!("status 7".parse::<Command>().unwrap(), Command::Status(7));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("".parse::<Command>().is_err());
        assert!("click 1".parse::<Command>().is_err());
        assert!("status abc".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
        assert!("q now".parse::<Command>().is_err());
    }

    #[test]
    fn scroll_is_bounded() {
        let engine = engine_with_vacant_spots();
        let mut ctl = controller();

        ctl.apply(Command::ScrollUp, &engine);
        assert_eq!(ctl.state().scroll_index, 0);

        for _ in 0..50 {
            ctl.apply(Command::ScrollDown, &engine);
        }
        // 빈 자리 30개, 표시 20행
        assert_eq!(ctl.state().scroll_index, 10);
        assert_eq!(ctl.visible_rows(&engine.vacant_ids()).len(), 20);

        ctl.sync(12);
        assert_eq!(ctl.state().scroll_index, 0);
    }

    #[test]
    fn overlay_click_selects_spot() {
        let engine = engine_with_vacant_spots();
        let mut ctl = controller();

        // 표시 배율 2배: 주차면 8 (x=15, y=15) 중심은 표시 좌표 (40, 40)
        ctl.apply(Command::Click { x: 40.0, y: 40.0 }, &engine);
        assert_eq!(ctl.state().selected, Some(8));

        // 빈 곳 클릭은 기존 선택 유지
        ctl.apply(Command::Click { x: 199.0, y: 199.0 }, &engine);
        assert_eq!(ctl.state().selected, Some(8));
    }

    #[test]
    fn list_click_uses_scroll() {
        let engine = engine_with_vacant_spots();
        let mut ctl = controller();
        for _ in 0..5 {
            ctl.apply(Command::ScrollDown, &engine);
        }
        ctl.apply(Command::ListClick { y: 30 + 20 * 3 }, &engine);
        assert_eq!(ctl.state().selected, Some(engine.vacant_ids()[8]));
    }

    #[test]
    fn quit_and_status() {
        let engine = engine_with_vacant_spots();
        let mut ctl = controller();
        assert_eq!(ctl.apply(Command::Status(3), &engine), CommandOutcome::Continue);
        assert_eq!(ctl.apply(Command::Status(99), &engine), CommandOutcome::Continue);
        assert_eq!(ctl.apply(Command::Quit, &engine), CommandOutcome::Quit);
    }

    #[test]
    fn forward_skips_invalid_lines() {
        let (tx, mut rx) = mpsc::channel(8);
        let input = Cursor::new("w\n\nbogus\nclick 1 2\nq\n");
        assert_eq!(forward_commands(input, &tx), 3);

        assert_eq!(rx.try_recv().unwrap(), Command::ScrollUp);
        assert_eq!(rx.try_recv().unwrap(), Command::Click { x: 1.0, y: 2.0 });
        assert_eq!(rx.try_recv().unwrap(), Command::Quit);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn forward_stops_when_receiver_closed() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        assert_eq!(forward_commands(Cursor::new("w\ns\n"), &tx), 0);
    }
}
