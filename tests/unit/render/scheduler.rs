use super::*;
use crate::foundation::error::GlyphError;
use crate::render::surface::SurfaceStatus;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
    fail_at: Option<u64>,
    fail_start: bool,
}

impl Recorder {
    fn boxed(name: &'static str, log: &Log, fail_at: Option<u64>) -> Box<dyn GlyphRenderer> {
        Box::new(Self {
            name,
            log: Rc::clone(log),
            fail_at,
            fail_start: false,
        })
    }

    fn failing_start(name: &'static str, log: &Log) -> Box<dyn GlyphRenderer> {
        Box::new(Self {
            name,
            log: Rc::clone(log),
            fail_at: None,
            fail_start: true,
        })
    }

    fn push(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{event}", self.name));
    }
}

impl GlyphRenderer for Recorder {
    fn start(&mut self) -> GlyphResult<()> {
        self.push("start");
        if self.fail_start {
            return Err(GlyphError::render(format!("{} cannot start", self.name)));
        }
        Ok(())
    }

    fn render(&mut self, _surface: &mut Surface, frame: FrameIndex) -> GlyphResult<()> {
        if self.fail_at == Some(frame.0) {
            return Err(GlyphError::render(format!("{} broke at {}", self.name, frame.0)));
        }
        self.push(&format!("frame{}", frame.0));
        Ok(())
    }

    fn stop(&mut self) {
        self.push("stop");
    }

    fn destroy(&mut self) {
        self.push("destroy");
    }
}

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn tick_without_renderer_is_a_noop() {
    let mut sched = FrameScheduler::default();
    let mut surface = Surface::new(4, 4).unwrap();
    assert!(!sched.tick(&mut surface).unwrap());
    assert_eq!(sched.state(), LoopState::Idle);
    assert_eq!(surface.status(), &SurfaceStatus::Blank);
}

#[test]
fn run_renders_sequential_frames_and_marks_surface() {
    let events = log();
    let mut sched = FrameScheduler::default();
    let mut surface = Surface::new(4, 4).unwrap();
    sched
        .attach(Family::Flow, Recorder::boxed("a", &events, None))
        .unwrap();

    assert_eq!(sched.run(&mut surface, 3).unwrap(), 3);
    assert_eq!(sched.frames_rendered(), 3);
    assert_eq!(sched.family(), Some(Family::Flow));
    assert_eq!(
        surface.status(),
        &SurfaceStatus::Glyph {
            family: Family::Flow,
            frame: FrameIndex(2)
        }
    );
    assert_eq!(
        *events.borrow(),
        ["a:start", "a:frame0", "a:frame1", "a:frame2"]
    );
}

#[test]
fn attaching_tears_down_the_previous_renderer_first() {
    let events = log();
    let mut sched = FrameScheduler::default();
    let mut surface = Surface::new(4, 4).unwrap();
    sched
        .attach(Family::Flow, Recorder::boxed("a", &events, None))
        .unwrap();
    sched.tick(&mut surface).unwrap();
    sched
        .attach(Family::Grid, Recorder::boxed("b", &events, None))
        .unwrap();
    sched.tick(&mut surface).unwrap();

    assert_eq!(
        *events.borrow(),
        ["a:start", "a:frame0", "a:stop", "a:destroy", "b:start", "b:frame0"]
    );
    assert_eq!(sched.family(), Some(Family::Grid));
}

#[test]
fn failing_frame_faults_the_loop_and_paints_fallback() {
    let events = log();
    let mut sched = FrameScheduler::default();
    let mut surface = Surface::new(8, 8).unwrap();
    sched
        .attach(Family::Chaos, Recorder::boxed("a", &events, Some(1)))
        .unwrap();

    let err = sched.run(&mut surface, 5).unwrap_err();
    assert!(matches!(err, GlyphError::Render(_)));
    assert_eq!(sched.state(), LoopState::Faulted);
    assert_eq!(sched.family(), None);
    let SurfaceStatus::Fallback { message } = surface.status() else {
        panic!("expected fallback, got {:?}", surface.status());
    };
    assert!(message.contains("broke at 1"));
    assert_eq!(
        *events.borrow(),
        ["a:start", "a:frame0", "a:stop", "a:destroy"]
    );

    assert!(!sched.tick(&mut surface).unwrap());
}

#[test]
fn stop_halts_frames_but_keeps_renderer() {
    let events = log();
    let mut sched = FrameScheduler::default();
    let mut surface = Surface::new(4, 4).unwrap();
    sched
        .attach(Family::Grid, Recorder::boxed("a", &events, None))
        .unwrap();
    sched.stop();
    assert_eq!(sched.state(), LoopState::Stopped);
    assert_eq!(sched.run(&mut surface, 2).unwrap(), 0);
    assert_eq!(sched.family(), Some(Family::Grid));
    sched.stop();
    assert_eq!(*events.borrow(), ["a:start", "a:stop"]);
}

#[test]
fn drop_destroys_the_attached_renderer() {
    let events = log();
    {
        let mut sched = FrameScheduler::default();
        sched
            .attach(Family::Grid, Recorder::boxed("a", &events, None))
            .unwrap();
    }
    assert_eq!(*events.borrow(), ["a:start", "a:stop", "a:destroy"]);
}

#[test]
fn renderer_that_fails_to_start_is_destroyed() {
    let events = log();
    let mut sched = FrameScheduler::default();
    sched
        .attach(Family::Grid, Recorder::boxed("a", &events, None))
        .unwrap();

    let err = sched
        .attach(Family::Flow, Recorder::failing_start("b", &events))
        .unwrap_err();
    assert!(matches!(err, GlyphError::Render(_)));
    assert_eq!(sched.family(), None);
    assert_eq!(
        *events.borrow(),
        ["a:start", "a:stop", "a:destroy", "b:start", "b:destroy"]
    );
}
