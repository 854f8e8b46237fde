//! CommandBridge: connects command sources to a flight sink.

use stick_proto::{
    parse_command, Command, NamedAction, ParseError, StatusFrame, StickIntent, StickPosition,
    StickSide, StickUpdate,
};

use crate::input::{AnalogSample, CommandSource, InputError, InputEvent};
use crate::mapper::{apply_deadzone, map_analog, map_command, map_named, MapperConfig};
use crate::output::{FlightSink, SinkError};
use crate::telemetry::{Notice, NoticeSink, TelemetrySink};

/// A bridge that turns inbound events into flight sink calls.
///
/// Every event produces at most one kind of sink action, and every outcome
/// the operator should know about is reported through the [`NoticeSink`].
/// Nothing here is fatal: after any error the bridge keeps accepting events.
///
/// # Error Handling
///
/// When the remote link drops, the bridge centers both sticks so the last
/// deflection does not persist.
pub struct CommandBridge<I, S, N, T> {
    input: I,
    sink: S,
    notices: N,
    telemetry: T,
    config: MapperConfig,
    intent: StickIntent,
}

impl<I, S, N, T> CommandBridge<I, S, N, T>
where
    I: CommandSource,
    S: FlightSink,
    N: NoticeSink,
    T: TelemetrySink,
{
    pub fn new(input: I, sink: S, notices: N, telemetry: T, config: MapperConfig) -> Self {
        Self {
            input,
            sink,
            notices,
            telemetry,
            config,
            intent: StickIntent::neutral(),
        }
    }

    /// Run the bridge until the source reports [`InputError::Closed`].
    pub async fn run(&mut self) {
        loop {
            if let Err(BridgeError::Input(InputError::Closed)) = self.process_one().await {
                return;
            }
        }
    }

    /// Receive a single event and act on it.
    ///
    /// Returns the result of the operation for testing purposes.
    pub async fn process_one(&mut self) -> Result<(), BridgeError> {
        match self.input.receive().await {
            Ok(InputEvent::Frame(frame)) => self.handle_frame(frame.as_ref()).await,
            Ok(InputEvent::Analog(sample)) => self.handle_analog(sample).await,
            Err(e) => {
                if e != InputError::Closed {
                    self.notices.notify(&Notice::InputFailed(e));
                }
                if matches!(e, InputError::Disconnected | InputError::Closed) {
                    let _ = self.apply_intent(StickIntent::neutral()).await;
                }
                Err(BridgeError::Input(e))
            }
        }
    }

    /// Parse one text frame and dispatch it.
    pub async fn handle_frame(&mut self, text: &str) -> Result<(), BridgeError> {
        self.dispatch(parse_command(text)).await
    }

    /// Dispatch an already-parsed command.
    ///
    /// Stick commands are forwarded even when they repeat the current intent.
    pub async fn dispatch(&mut self, command: Command<'_>) -> Result<(), BridgeError> {
        match command {
            Command::Unknown { raw, reason } => {
                self.notices.notify(&Notice::Rejected { raw, reason });
                Err(BridgeError::Parse(reason))
            }
            Command::Move { .. } => {
                let intent = map_command(&command, &self.config).unwrap_or_default();
                self.apply_intent(intent).await
            }
            Command::Action(action) => self.dispatch_action(action).await,
        }
    }

    /// Apply one local joystick sample to its stick and echo it upstream.
    pub async fn handle_analog(&mut self, sample: AnalogSample) -> Result<(), BridgeError> {
        let echo = StatusFrame::Joystick {
            side: sample.side,
            x: apply_deadzone(sample.x, self.config.deadzone),
            y: apply_deadzone(sample.y, self.config.deadzone),
        };
        self.send_status(&echo).await;

        let update = map_analog(sample.side, sample.x, sample.y, &self.config);
        self.write_stick(update.side, update.position).await
    }

    async fn dispatch_action(&mut self, action: NamedAction) -> Result<(), BridgeError> {
        if action.is_stick_action() {
            let intent = map_named(action, &self.config).unwrap_or_default();
            self.apply_intent(intent).await?;
            if action == NamedAction::Stop {
                self.notices.notify(&Notice::Stopped);
            }
            return Ok(());
        }

        match action {
            NamedAction::Takeoff => {
                let result = self.sink.start_takeoff().await;
                self.report_action(action, result)
            }
            NamedAction::Land => {
                let result = self.sink.start_landing().await;
                self.report_action(action, result)
            }
            NamedAction::EnableStick => {
                let result = self.sink.enable_virtual_stick().await;
                self.report_action(action, result)
            }
            NamedAction::DisableStick => {
                let result = self.sink.disable_virtual_stick().await;
                self.report_action(action, result)
            }
            NamedAction::ShowHeight => self.report_height().await,
            // Stick actions handled above
            _ => Ok(()),
        }
    }

    /// Best-effort upstream status; skipped when the sink has no link.
    async fn send_status(&mut self, frame: &StatusFrame) {
        if self.telemetry.supports_telemetry() {
            let _ = self.telemetry.send_status(frame).await;
        }
    }

    fn report_action(
        &mut self,
        action: NamedAction,
        result: Result<(), SinkError>,
    ) -> Result<(), BridgeError> {
        match result {
            Ok(()) => {
                self.notices.notify(&Notice::ActionSucceeded(action));
                Ok(())
            }
            Err(error) => {
                self.notices.notify(&Notice::ActionFailed { action, error });
                Err(BridgeError::Sink(error))
            }
        }
    }

    async fn report_height(&mut self) -> Result<(), BridgeError> {
        match self.sink.height().await {
            Ok(meters) => {
                self.notices.notify(&Notice::Height(meters));
                self.send_status(&StatusFrame::Height(meters)).await;
                Ok(())
            }
            Err(error) => {
                self.notices.notify(&Notice::ActionFailed {
                    action: NamedAction::ShowHeight,
                    error,
                });
                Err(BridgeError::Sink(error))
            }
        }
    }

    /// Write both sticks, left first. Stops at the first failure.
    async fn apply_intent(&mut self, intent: StickIntent) -> Result<(), BridgeError> {
        self.write_stick(StickSide::Left, intent.left).await?;
        self.write_stick(StickSide::Right, intent.right).await
    }

    async fn write_stick(
        &mut self,
        side: StickSide,
        position: StickPosition,
    ) -> Result<(), BridgeError> {
        let result = match side {
            StickSide::Left => self.sink.set_left_position(position.x, position.y).await,
            StickSide::Right => self.sink.set_right_position(position.x, position.y).await,
        };
        match result {
            Ok(()) => {
                self.intent.apply_update(StickUpdate::new(side, position));
                Ok(())
            }
            Err(error) => {
                self.notices.notify(&Notice::StickFailed { side, error });
                Err(BridgeError::Sink(error))
            }
        }
    }

    /// Last stick positions the sink accepted.
    pub fn intent(&self) -> StickIntent {
        self.intent
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Get a reference to the command source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the command source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Get a reference to the flight sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the flight sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Decompose the bridge into its components.
    pub fn into_parts(self) -> (I, S, N, T) {
        (self.input, self.sink, self.notices, self.telemetry)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the command source.
    Input(InputError),
    /// Frame did not parse.
    Parse(ParseError),
    /// Error from the flight sink.
    Sink(SinkError),
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input: {}", e),
            Self::Parse(e) => write!(f, "parse: {}", e),
            Self::Sink(e) => write!(f, "sink: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mapper::DEFAULT_MAPPER_CONFIG;
    use crate::telemetry::{NullTelemetrySink, TelemetryError};
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::collections::VecDeque;
    use std::string::{String, ToString};
    use std::vec;
    use std::vec::Vec;

    type Event = Result<InputEvent<&'static str>, InputError>;

    struct MockInput {
        events: VecDeque<Event>,
    }

    impl MockInput {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: events.into(),
            }
        }

        fn frames(frames: &[&'static str]) -> Self {
            Self::new(frames.iter().map(|f| Ok(InputEvent::Frame(*f))).collect())
        }
    }

    impl CommandSource for MockInput {
        type Frame = &'static str;

        fn receive(&mut self) -> impl Future<Output = Event> {
            core::future::ready(self.events.pop_front().unwrap_or(Err(InputError::Closed)))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Takeoff,
        Land,
        Enable,
        Disable,
        Left(i16, i16),
        Right(i16, i16),
        Height,
    }

    #[derive(Default)]
    struct MockSink {
        calls: Vec<Call>,
        fail_takeoff: Option<SinkError>,
        fail_left: Option<SinkError>,
        height: Option<f32>,
    }

    impl MockSink {
        fn answer(
            &mut self,
            call: Call,
            failure: Option<SinkError>,
        ) -> impl Future<Output = Result<(), SinkError>> {
            self.calls.push(call);
            core::future::ready(failure.map_or(Ok(()), Err))
        }
    }

    impl FlightSink for MockSink {
        fn start_takeoff(&mut self) -> impl Future<Output = Result<(), SinkError>> {
            let failure = self.fail_takeoff;
            self.answer(Call::Takeoff, failure)
        }

        fn start_landing(&mut self) -> impl Future<Output = Result<(), SinkError>> {
            self.answer(Call::Land, None)
        }

        fn enable_virtual_stick(&mut self) -> impl Future<Output = Result<(), SinkError>> {
            self.answer(Call::Enable, None)
        }

        fn disable_virtual_stick(&mut self) -> impl Future<Output = Result<(), SinkError>> {
            self.answer(Call::Disable, None)
        }

        fn set_left_position(
            &mut self,
            x: i16,
            y: i16,
        ) -> impl Future<Output = Result<(), SinkError>> {
            let failure = self.fail_left;
            self.answer(Call::Left(x, y), failure)
        }

        fn set_right_position(
            &mut self,
            x: i16,
            y: i16,
        ) -> impl Future<Output = Result<(), SinkError>> {
            self.answer(Call::Right(x, y), None)
        }

        async fn height(&mut self) -> Result<f32, SinkError> {
            self.calls.push(Call::Height);
            self.height.ok_or(SinkError::Unsupported)
        }
    }

    // Sink that keeps the default `height`
    struct SticksOnlySink;

    impl FlightSink for SticksOnlySink {
        async fn start_takeoff(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
        async fn start_landing(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
        async fn enable_virtual_stick(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
        async fn disable_virtual_stick(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
        async fn set_left_position(&mut self, _x: i16, _y: i16) -> Result<(), SinkError> {
            Ok(())
        }
        async fn set_right_position(&mut self, _x: i16, _y: i16) -> Result<(), SinkError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockNotices {
        seen: Vec<(bool, String)>,
    }

    impl NoticeSink for MockNotices {
        fn notify(&mut self, notice: &Notice<'_>) {
            self.seen.push((notice.is_error(), notice.to_string()));
        }
    }

    #[derive(Default)]
    struct MockTelemetry {
        sent: Vec<String>,
    }

    impl TelemetrySink for MockTelemetry {
        async fn send_status(&mut self, frame: &StatusFrame) -> Result<(), TelemetryError> {
            self.sent.push(frame.to_string());
            Ok(())
        }

        fn supports_telemetry(&self) -> bool {
            true
        }
    }

    // Telemetry sink without an upstream link
    #[derive(Default)]
    struct UnlinkedTelemetry {
        attempts: usize,
    }

    impl TelemetrySink for UnlinkedTelemetry {
        async fn send_status(&mut self, _frame: &StatusFrame) -> Result<(), TelemetryError> {
            self.attempts += 1;
            Err(TelemetryError::NotConnected)
        }
    }

    type TestBridge = CommandBridge<MockInput, MockSink, MockNotices, MockTelemetry>;

    fn bridge_with(input: MockInput, sink: MockSink) -> TestBridge {
        CommandBridge::new(
            input,
            sink,
            MockNotices::default(),
            MockTelemetry::default(),
            DEFAULT_MAPPER_CONFIG,
        )
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
        }
    }

    #[test]
    fn test_unknown_frame_makes_no_sink_call() {
        let mut bridge = bridge_with(MockInput::frames(&["gibberish"]), MockSink::default());

        let result = block_on(bridge.process_one());
        assert_eq!(result, Err(BridgeError::Parse(ParseError::UnknownCommand)));
        assert!(bridge.sink().calls.is_empty());
        assert_eq!(
            bridge.notices().seen,
            vec![(true, "Unknown command from server: gibberish".to_string())]
        );
    }

    #[test]
    fn test_invalid_move_parameters_notice() {
        let mut bridge = bridge_with(MockInput::frames(&["movedrone:1,2"]), MockSink::default());

        let result = block_on(bridge.process_one());
        assert_eq!(
            result,
            Err(BridgeError::Parse(ParseError::InvalidParameters))
        );
        assert!(bridge.sink().calls.is_empty());
        assert_eq!(bridge.notices().seen.len(), 1);
    }

    #[test]
    fn test_move_frame_sets_both_sticks() {
        let mut bridge = bridge_with(
            MockInput::frames(&["MoveDrone: 0.5, -0.3, 0.0, 1.0"]),
            MockSink::default(),
        );

        assert!(block_on(bridge.process_one()).is_ok());
        assert_eq!(
            bridge.sink().calls,
            vec![Call::Left(0, -198), Call::Right(330, 660)]
        );
        assert_eq!(bridge.intent().right, StickPosition::new(330, 660));
    }

    #[test]
    fn test_named_stick_action_resets_other_axes() {
        let mut bridge = bridge_with(MockInput::frames(&["forward", "yaw+"]), MockSink::default());

        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        assert_eq!(
            bridge.sink().calls,
            vec![
                Call::Left(0, 0),
                Call::Right(0, 33),
                Call::Left(66, 0),
                Call::Right(0, 0),
            ]
        );
        assert!(bridge.notices().seen.is_empty());
    }

    #[test]
    fn test_repeated_command_is_forwarded_again() {
        let mut bridge = bridge_with(MockInput::frames(&["up", "UP"]), MockSink::default());

        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls.len(), 4);
    }

    #[test]
    fn test_stop_centers_and_notifies() {
        let mut bridge = bridge_with(MockInput::frames(&["right", "S"]), MockSink::default());

        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        assert_eq!(
            &bridge.sink().calls[2..],
            &[Call::Left(0, 0), Call::Right(0, 0)]
        );
        assert!(bridge.intent().is_neutral());
        assert_eq!(
            bridge.notices().seen,
            vec![(false, "Drone stopped".to_string())]
        );
    }

    #[test]
    fn test_takeoff_success_and_failure() {
        let mut bridge = bridge_with(MockInput::frames(&["takeoff", "land"]), MockSink::default());
        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls, vec![Call::Takeoff, Call::Land]);
        assert_eq!(
            bridge.notices().seen,
            vec![
                (false, "Takeoff initiated successfully".to_string()),
                (false, "Landing initiated successfully".to_string()),
            ]
        );

        let sink = MockSink {
            fail_takeoff: Some(SinkError::Rejected),
            ..MockSink::default()
        };
        let mut bridge = bridge_with(MockInput::frames(&["TAKEOFF", "enable"]), sink);
        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Sink(SinkError::Rejected))
        );
        // Failure is not fatal
        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls, vec![Call::Takeoff, Call::Enable]);
        assert_eq!(
            bridge.notices().seen[0],
            (true, "Error initiating takeoff: rejected by flight controller".to_string())
        );
    }

    #[test]
    fn test_left_failure_skips_right() {
        let sink = MockSink {
            fail_left: Some(SinkError::NotReady),
            ..MockSink::default()
        };
        let mut bridge = bridge_with(MockInput::frames(&["movedrone:0.1,0.1,0.1,0.1"]), sink);

        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Sink(SinkError::NotReady))
        );
        assert_eq!(bridge.sink().calls, vec![Call::Left(66, 66)]);
        assert!(bridge.intent().is_neutral());
        assert_eq!(bridge.notices().seen.len(), 1);
    }

    #[test]
    fn test_analog_updates_one_stick_and_echoes() {
        let sample = AnalogSample::new(StickSide::Right, 0.01, 0.5);
        let mut bridge = bridge_with(
            MockInput::new(vec![Ok(InputEvent::Analog(sample))]),
            MockSink::default(),
        );

        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls, vec![Call::Right(0, 330)]);
        assert_eq!(
            bridge.telemetry().sent,
            vec!["Joystick right: 0.0, 0.5".to_string()]
        );
    }

    #[test]
    fn test_no_status_without_upstream_link() {
        let sample = AnalogSample::new(StickSide::Left, -0.5, 0.0);
        let input = MockInput::new(vec![
            Ok(InputEvent::Analog(sample)),
            Ok(InputEvent::Frame("h")),
        ]);
        let sink = MockSink {
            height: Some(2.0),
            ..MockSink::default()
        };
        let mut bridge = CommandBridge::new(
            input,
            sink,
            MockNotices::default(),
            UnlinkedTelemetry::default(),
            DEFAULT_MAPPER_CONFIG,
        );

        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls, vec![Call::Left(-330, 0), Call::Height]);
        assert_eq!(bridge.telemetry().attempts, 0);
        assert_eq!(
            bridge.notices().seen,
            vec![(false, "Height: 2.0 m".to_string())]
        );
    }

    #[test]
    fn test_height_reported_upstream() {
        let sink = MockSink {
            height: Some(3.5),
            ..MockSink::default()
        };
        let mut bridge = bridge_with(MockInput::frames(&["h"]), sink);

        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.sink().calls, vec![Call::Height]);
        assert_eq!(bridge.telemetry().sent, vec!["height: 3.5".to_string()]);
        assert_eq!(
            bridge.notices().seen,
            vec![(false, "Height: 3.5 m".to_string())]
        );
    }

    #[test]
    fn test_height_unsupported_by_default() {
        let mut bridge = CommandBridge::new(
            MockInput::frames(&["H"]),
            SticksOnlySink,
            MockNotices::default(),
            NullTelemetrySink,
            DEFAULT_MAPPER_CONFIG,
        );

        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Sink(SinkError::Unsupported))
        );
        assert!(bridge.notices().seen[0].0);
    }

    #[test]
    fn test_disconnect_centers_sticks() {
        let input = MockInput::new(vec![
            Ok(InputEvent::Frame("backward")),
            Err(InputError::Disconnected),
        ]);
        let mut bridge = bridge_with(input, MockSink::default());

        block_on(bridge.process_one()).unwrap();
        assert_eq!(
            block_on(bridge.process_one()),
            Err(BridgeError::Input(InputError::Disconnected))
        );
        assert_eq!(
            &bridge.sink().calls[2..],
            &[Call::Left(0, 0), Call::Right(0, 0)]
        );
        assert!(bridge.intent().is_neutral());
        assert_eq!(bridge.notices().seen.len(), 1);
    }

    #[test]
    fn test_run_returns_when_closed() {
        let input = MockInput::new(vec![
            Ok(InputEvent::Frame("enable")),
            Err(InputError::Io),
            Ok(InputEvent::Frame("nonsense")),
            Ok(InputEvent::Frame("disable")),
        ]);
        let mut bridge = bridge_with(input, MockSink::default());

        block_on(bridge.run());
        let (input, sink, notices, _) = bridge.into_parts();
        assert!(input.events.is_empty());
        assert_eq!(
            sink.calls,
            vec![
                Call::Enable,
                Call::Disable,
                Call::Left(0, 0),
                Call::Right(0, 0),
            ]
        );
        // enable, io error, nonsense, disable; closing is silent
        assert_eq!(notices.seen.len(), 4);
    }
}
