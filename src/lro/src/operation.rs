// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{Payload, Results, State, WaitPolicy};
use futures::future::{BoxFuture, FutureExt};
use gax::Result;
use gax::error::Error;
use gax::error::rpc::Status;
use gax::options::RequestOptions;
use gax::polling_backoff_policy::PollingBackoffPolicy;
use longrunning::client::Operations;
use std::sync::Arc;
use std::time::Duration;
use wkt::message::Message;
use wkt::registry::{AnyMessage, TypeRegistry};

type Decoder = fn(&wkt::Any) -> std::result::Result<Box<dyn AnyMessage>, wkt::AnyError>;
type Callback = Box<dyn FnOnce(&Operation) + Send>;
type DelayHook = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// The expected message type of a response or metadata payload.
#[derive(Clone, Copy)]
struct TypeHint {
    type_url: &'static str,
    decode: Decoder,
}

impl TypeHint {
    fn of<T>() -> Self
    where
        T: Message + AnyMessage,
    {
        Self {
            type_url: T::typename(),
            decode: decode::<T>,
        }
    }
}

fn decode<T>(any: &wkt::Any) -> std::result::Result<Box<dyn AnyMessage>, wkt::AnyError>
where
    T: Message + AnyMessage,
{
    let message = any.to_msg::<T>()?;
    Ok(Box::new(message))
}

/// A handle to a long-running operation.
///
/// Services return a [longrunning::model::Operation] from RPCs that take a
/// long time to complete. The handle wraps that operation, and uses the
/// `Operations` client to refresh it, wait for it to complete, cancel it, or
/// delete it.
///
/// The response and metadata payloads are [Any][wkt::Any] values. The handle
/// decodes them using, in order: the type given to
/// [with_result_type][Operation::with_result_type] (or
/// [with_metadata_type][Operation::with_metadata_type]), the type registry
/// set with [with_registry][Operation::with_registry] or else the
/// [global registry][wkt::registry::global], and finally returns the `Any`
/// unchanged.
///
/// # Example
/// ```
/// # use google_cloud_lro::{Operation, State};
/// # use longrunning::client::Operations;
/// # use longrunning::model;
/// # async fn sample(client: Operations, op: model::Operation) -> gax::Result<()> {
/// let mut op = Operation::new(op, client)
///     .with_result_type::<wkt::Empty>();
/// op.on_done(|op| println!("operation {} is done", op.name()));
/// match op.wait_until_done().await? {
///     State::Running => println!("still running, try again later"),
///     State::Failed(status) => println!("failed: {status:?}"),
///     State::Succeeded(_) => println!("response: {:?}", op.response()),
///     _ => {}
/// }
/// # Ok(()) }
/// ```
pub struct Operation {
    op: longrunning::model::Operation,
    state: State,
    client: Operations,
    options: RequestOptions,
    result_type: Option<TypeHint>,
    metadata_type: Option<TypeHint>,
    registry: Option<Arc<TypeRegistry>>,
    callbacks: Vec<Callback>,
    delay: Option<DelayHook>,
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("op", &self.op)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("result_type", &self.result_type.map(|h| h.type_url))
            .field("metadata_type", &self.metadata_type.map(|h| h.type_url))
            .field("registry", &self.registry)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Operation {
    /// Creates a handle for `op`, using `client` to poll it.
    pub fn new(op: longrunning::model::Operation, client: Operations) -> Self {
        let state = State::from_operation(&op);
        Self {
            op,
            state,
            client,
            options: RequestOptions::default(),
            result_type: None,
            metadata_type: None,
            registry: None,
            callbacks: Vec::new(),
            delay: None,
        }
    }

    /// Decodes responses of type `R`.
    ///
    /// Responses of a different type are decoded using the registry.
    pub fn with_result_type<R>(mut self) -> Self
    where
        R: Message + AnyMessage,
    {
        self.result_type = Some(TypeHint::of::<R>());
        self
    }

    /// Decodes metadata of type `M`.
    ///
    /// Metadata of a different type is decoded using the registry.
    pub fn with_metadata_type<M>(mut self) -> Self
    where
        M: Message + AnyMessage,
    {
        self.metadata_type = Some(TypeHint::of::<M>());
        self
    }

    /// Uses `registry` instead of the global registry to decode payloads.
    pub fn with_registry<V: Into<Arc<TypeRegistry>>>(mut self, registry: V) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Sets the options for the RPCs issued by the handle.
    ///
    /// The polling backoff policy in these options, if any, replaces the
    /// default backoff in [wait_until_done][Operation::wait_until_done].
    pub fn with_options<V: Into<RequestOptions>>(mut self, options: V) -> Self {
        self.options = options.into();
        self
    }

    /// Replaces the sleep between polls.
    ///
    /// The hook receives each delay computed by the wait loop. The default
    /// is [tokio::time::sleep].
    pub fn with_delay_hook<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Duration) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.delay = Some(Arc::new(move |d| hook(d).boxed()));
        self
    }

    /// The server-assigned name of the operation.
    pub fn name(&self) -> &str {
        &self.op.name
    }

    /// Returns true if the operation completed, as of the last poll.
    pub fn done(&self) -> bool {
        self.state.is_done()
    }

    /// The state as of the last poll.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The operation, as returned by the last poll.
    pub fn operation(&self) -> &longrunning::model::Operation {
        &self.op
    }

    /// The options used by the RPCs issued by the handle.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Returns true if the operation completed with an error.
    pub fn is_error(&self) -> bool {
        matches!(self.state, State::Failed(_))
    }

    /// The error, if the operation failed.
    pub fn error(&self) -> Option<&Status> {
        match &self.state {
            State::Failed(status) => Some(status),
            _ => None,
        }
    }

    /// Returns true if the operation completed with a response.
    pub fn has_response(&self) -> bool {
        matches!(self.state, State::Succeeded(Some(_)))
    }

    /// The response, if the operation completed with one.
    pub fn response(&self) -> Option<Payload> {
        match &self.state {
            State::Succeeded(Some(any)) => Some(self.decode(any, self.result_type)),
            _ => None,
        }
    }

    /// The latest metadata reported by the operation, if any.
    pub fn metadata(&self) -> Option<Payload> {
        self.op
            .metadata
            .as_ref()
            .map(|any| self.decode(any, self.metadata_type))
    }

    /// Decodes the response as a `R`.
    ///
    /// Returns `Ok(None)` if the operation has no response. Fails with a
    /// [deserialization][Error::is_deserialization] error if the response is
    /// not a `R`.
    pub fn response_as<R: Message>(&self) -> Result<Option<R>> {
        match &self.state {
            State::Succeeded(Some(any)) => any.to_msg::<R>().map(Some).map_err(Error::deser),
            _ => Ok(None),
        }
    }

    /// Decodes the metadata as a `M`.
    ///
    /// Returns `Ok(None)` if the operation has no metadata. Fails with a
    /// [deserialization][Error::is_deserialization] error if the metadata is
    /// not a `M`.
    pub fn metadata_as<M: Message>(&self) -> Result<Option<M>> {
        self.op
            .metadata
            .as_ref()
            .map(|any| any.to_msg::<M>().map_err(Error::deser))
            .transpose()
    }

    /// The outcome of the operation, or `None` while it is running.
    pub fn results(&self) -> Option<Results<'_>> {
        match &self.state {
            State::Running => None,
            State::Failed(status) => Some(Results::Error(status)),
            State::Succeeded(_) => Some(Results::Response(self.response())),
        }
    }

    /// Registers a callback to run once the operation is done.
    ///
    /// Callbacks run in registration order, once, during the poll that
    /// observes the operation completing. If the operation is already done
    /// the callback runs immediately.
    pub fn on_done<F>(&mut self, callback: F)
    where
        F: FnOnce(&Operation) + Send + 'static,
    {
        if self.state.is_done() {
            callback(self);
        } else {
            self.callbacks.push(Box::new(callback));
        }
    }

    /// Refreshes the operation using the handle's options.
    pub async fn reload(&mut self) -> Result<&State> {
        let options = self.options.clone();
        self.reload_with_options(options).await
    }

    /// Refreshes the operation using `options`.
    ///
    /// On error the handle is unchanged. Once the operation is done its state
    /// no longer changes, a reload only refreshes the metadata.
    pub async fn reload_with_options(&mut self, options: RequestOptions) -> Result<&State> {
        let op = self
            .client
            .get_operation()
            .set_name(&self.op.name)
            .with_request_options(options)
            .send()
            .await?;
        tracing::debug!(name = %self.op.name, done = op.done, "reloaded operation");
        if self.state.is_done() {
            // Done is terminal, only the metadata may still change.
            self.op.metadata = op.metadata;
            return Ok(&self.state);
        }
        self.state = State::from_operation(&op);
        self.op = op;
        if self.state.is_done() {
            tracing::debug!(name = %self.op.name, state = ?self.state, "operation completed");
            self.run_callbacks();
        }
        Ok(&self.state)
    }

    /// Polls the operation until it is done, or until the default timeout.
    ///
    /// Returns immediately, without any requests, if the handle is already
    /// done.
    ///
    /// Uses the defaults in [WaitPolicy]. If the handle's options include a
    /// polling backoff policy, that policy computes the delays instead.
    ///
    /// Returns the last state. Reaching the timeout is not an error, the
    /// returned state is [State::Running].
    pub async fn wait_until_done(&mut self) -> Result<&State> {
        let policy = WaitPolicy::default();
        let backoff = self
            .options
            .polling_backoff_policy()
            .clone()
            .unwrap_or_else(|| Arc::new(policy.backoff()));
        self.wait(backoff, policy.timeout()).await
    }

    /// Polls the operation until it is done, or until `policy` times out.
    ///
    /// Returns the last state. Reaching the timeout is not an error, the
    /// returned state is [State::Running].
    pub async fn wait_until_done_with(&mut self, policy: WaitPolicy) -> Result<&State> {
        self.wait(Arc::new(policy.backoff()), policy.timeout()).await
    }

    /// Requests the cancellation of the operation.
    ///
    /// Does not change the local state, use [reload][Operation::reload] to
    /// observe the effect.
    pub async fn cancel(&self) -> Result<()> {
        self.client
            .cancel_operation()
            .set_name(&self.op.name)
            .with_request_options(self.options.clone())
            .send()
            .await
    }

    /// Deletes the operation.
    ///
    /// Does not change the local state.
    pub async fn delete(&self) -> Result<()> {
        self.client
            .delete_operation()
            .set_name(&self.op.name)
            .with_request_options(self.options.clone())
            .send()
            .await
    }

    async fn wait(
        &mut self,
        backoff: Arc<dyn PollingBackoffPolicy>,
        timeout: Duration,
    ) -> Result<&State> {
        let loop_start = tokio::time::Instant::now();
        let deadline = loop_start + timeout;
        let mut attempt_count = 0_u32;
        if self.state.is_done() {
            return Ok(&self.state);
        }
        loop {
            attempt_count = attempt_count.saturating_add(1);
            self.reload().await?;
            if self.state.is_done() {
                return Ok(&self.state);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                tracing::debug!(
                    name = %self.op.name,
                    attempt_count,
                    "deadline reached while the operation is running"
                );
                return Ok(&self.state);
            }
            let delay = backoff
                .wait_period(loop_start.into_std(), attempt_count)
                .min(deadline - now);
            tracing::debug!(name = %self.op.name, attempt_count, ?delay, "waiting before next poll");
            self.sleep(delay).await;
        }
    }

    async fn sleep(&self, delay: Duration) {
        match &self.delay {
            Some(hook) => hook(delay).await,
            None => tokio::time::sleep(delay).await,
        }
    }

    fn run_callbacks(&mut self) {
        let callbacks = std::mem::take(&mut self.callbacks);
        for callback in callbacks {
            callback(self);
        }
    }

    fn decode(&self, any: &wkt::Any, hint: Option<TypeHint>) -> Payload {
        if let Some(hint) = hint.filter(|h| any.type_url() == Some(h.type_url)) {
            match (hint.decode)(any) {
                Ok(message) => return Payload::Message(message),
                Err(e) => tracing::debug!(type_url = hint.type_url, "cannot decode payload: {e}"),
            }
        }
        let decoded = match &self.registry {
            Some(registry) => registry.decode(any),
            None => wkt::registry::global().decode(any),
        };
        match decoded {
            Some(Ok(message)) => Payload::Message(message),
            Some(Err(e)) => {
                tracing::debug!(type_url = any.type_url(), "cannot decode payload: {e}");
                Payload::Any(any.clone())
            }
            None => Payload::Any(any.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::error::rpc::Code;
    use gax::exponential_backoff::ExponentialBackoffBuilder;
    use gax::response::Response;
    use longrunning::model;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    mockall::mock! {
        #[derive(Debug)]
        Operations {}
        impl longrunning::stub::Operations for Operations {
            async fn list_operations(&self, req: model::ListOperationsRequest, options: RequestOptions) -> Result<Response<model::ListOperationsResponse>>;
            async fn get_operation(&self, req: model::GetOperationRequest, options: RequestOptions) -> Result<Response<model::Operation>>;
            async fn delete_operation(&self, req: model::DeleteOperationRequest, options: RequestOptions) -> Result<Response<()>>;
            async fn cancel_operation(&self, req: model::CancelOperationRequest, options: RequestOptions) -> Result<Response<()>>;
        }
    }

    type TestResult = anyhow::Result<()>;
    const NAME: &str = "projects/p/operations/op-1";

    fn running() -> model::Operation {
        model::Operation::new().set_name(NAME)
    }

    fn succeeded<T: Message>(response: &T) -> anyhow::Result<model::Operation> {
        let any = wkt::Any::from_msg(response)?;
        Ok(running().set_done(true).set_response(any))
    }

    fn failed() -> model::Operation {
        running().set_done(true).set_error(
            Status::default()
                .set_code(Code::ResourceExhausted)
                .set_message("quota"),
        )
    }

    fn handle(op: model::Operation, mock: MockOperations) -> Operation {
        Operation::new(op, Operations::from_stub(mock))
    }

    /// Returns a delay hook that records the delays, without sleeping.
    fn recorder() -> (
        Arc<Mutex<Vec<Duration>>>,
        impl Fn(Duration) -> std::future::Ready<()> + Send + Sync + 'static,
    ) {
        let delays = Arc::new(Mutex::new(Vec::new()));
        let recorded = delays.clone();
        let hook = move |d| {
            recorded.lock().unwrap().push(d);
            std::future::ready(())
        };
        (delays, hook)
    }

    #[test]
    fn accessors_running() {
        let op = handle(running(), MockOperations::new());
        assert_eq!(op.name(), NAME);
        assert!(!op.done());
        assert_eq!(op.state(), &State::Running);
        assert!(!op.is_error());
        assert!(op.error().is_none());
        assert!(!op.has_response());
        assert!(op.response().is_none());
        assert!(op.metadata().is_none());
        assert!(op.results().is_none());
        assert_eq!(op.operation(), &running());
        let debug = format!("{op:?}");
        assert!(debug.contains(NAME), "{debug}");
    }

    #[test]
    fn accessors_failed() {
        let op = handle(failed(), MockOperations::new());
        assert!(op.done());
        assert!(op.is_error());
        assert_eq!(op.error().map(|s| s.code), Some(Code::ResourceExhausted));
        assert!(!op.has_response());
        assert!(op.response().is_none());
        match op.results() {
            Some(Results::Error(status)) => assert_eq!(status.message, "quota"),
            r => panic!("unexpected results {r:?}"),
        }
    }

    #[test]
    fn accessors_succeeded() -> TestResult {
        let ts = wkt::Timestamp::clamp(123, 0);
        let op = handle(succeeded(&ts)?, MockOperations::new());
        assert!(op.done());
        assert!(!op.is_error());
        assert!(op.has_response());
        let response = op.response().expect("has a response");
        assert_eq!(response.downcast_ref::<wkt::Timestamp>(), Some(&ts));
        assert_eq!(op.response_as::<wkt::Timestamp>()?, Some(ts));
        let err = op.response_as::<wkt::Empty>().unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        assert!(matches!(op.results(), Some(Results::Response(Some(_)))));

        let op = handle(running().set_done(true), MockOperations::new());
        assert!(!op.has_response());
        assert!(matches!(op.results(), Some(Results::Response(None))));
        assert_eq!(op.response_as::<wkt::Timestamp>()?, None);
        Ok(())
    }

    #[test]
    fn metadata() -> TestResult {
        let ts = wkt::Timestamp::clamp(456, 0);
        let op = running().set_metadata(wkt::Any::from_msg(&ts)?);
        let op = handle(op, MockOperations::new()).with_metadata_type::<wkt::Timestamp>();
        let metadata = op.metadata().expect("has metadata");
        assert_eq!(metadata.downcast_ref::<wkt::Timestamp>(), Some(&ts));
        assert_eq!(op.metadata_as::<wkt::Timestamp>()?, Some(ts));
        assert!(op.metadata_as::<wkt::Empty>().is_err());
        Ok(())
    }

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Widget {
        name: String,
    }

    impl Message for Widget {
        fn typename() -> &'static str {
            "type.googleapis.com/test.v1.Widget"
        }
    }

    #[test]
    fn decode_with_hint_registry_and_raw() -> TestResult {
        let widget = Widget {
            name: "w-1".into(),
        };
        let op = succeeded(&widget)?;

        // Unknown type, and no hint: the raw `Any`.
        let got = handle(op.clone(), MockOperations::new()).response();
        let any = got.as_ref().and_then(Payload::as_any);
        assert_eq!(any.and_then(wkt::Any::type_url), Some(Widget::typename()));

        // With a hint.
        let got = handle(op.clone(), MockOperations::new())
            .with_result_type::<Widget>()
            .response();
        assert_eq!(
            got.as_ref().and_then(|p| p.downcast_ref::<Widget>()),
            Some(&widget)
        );

        // A mismatched hint falls back to the registry.
        let mut registry = TypeRegistry::new();
        registry.register::<Widget>();
        let got = handle(op.clone(), MockOperations::new())
            .with_result_type::<wkt::Empty>()
            .with_registry(registry)
            .response();
        assert_eq!(
            got.as_ref().and_then(|p| p.downcast_ref::<Widget>()),
            Some(&widget)
        );

        // The global registry has the well-known types.
        let ts = wkt::Timestamp::clamp(789, 0);
        let got = handle(succeeded(&ts)?, MockOperations::new()).response();
        assert_eq!(
            got.as_ref().and_then(|p| p.downcast_ref::<wkt::Timestamp>()),
            Some(&ts)
        );
        Ok(())
    }

    #[test]
    fn decode_unknown_type_url() -> TestResult {
        let any = serde_json::from_value::<wkt::Any>(serde_json::json!({
            "@type": "type.unknown.tld/this.does.not.Exist",
            "value": "abc",
        }))?;
        let op = running().set_done(true).set_response(any.clone());
        let op = handle(op, MockOperations::new()).with_result_type::<Widget>();
        let got = op.response().expect("has a response");
        assert_eq!(got.as_any(), Some(&any));
        Ok(())
    }

    #[tokio::test]
    async fn reload_runs_callbacks_once() -> TestResult {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .withf(|r, _| r.name == NAME)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(running())));
        mock.expect_get_operation()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(failed())));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut op = handle(running(), mock);
        for id in ["a", "b"] {
            let calls = calls.clone();
            op.on_done(move |op| calls.lock().unwrap().push((id, op.is_error())));
        }

        assert_eq!(op.reload().await?, &State::Running);
        assert!(calls.lock().unwrap().is_empty());
        assert!(op.reload().await?.is_done());
        assert_eq!(*calls.lock().unwrap(), vec![("a", true), ("b", true)]);
        op.reload().await?;
        assert_eq!(calls.lock().unwrap().len(), 2);

        // Already done, runs immediately.
        let c = calls.clone();
        op.on_done(move |_| c.lock().unwrap().push(("c", false)));
        assert_eq!(calls.lock().unwrap().last(), Some(&("c", false)));
        Ok(())
    }

    #[tokio::test]
    async fn reload_error_keeps_state() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(1)
            .returning(|_, _| Err(Error::service(Status::default().set_code(Code::NotFound))));
        let mut op = handle(running(), mock);
        let err = op.reload().await.unwrap_err();
        assert_eq!(err.status().map(|s| s.code), Some(Code::NotFound));
        assert_eq!(op.state(), &State::Running);
        Ok(())
    }

    #[tokio::test]
    async fn reload_with_options() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .withf(|_, o| o.user_agent().as_deref() == Some("test-only"))
            .times(1)
            .returning(|_, _| Ok(Response::from(running())));
        let mut op = handle(running(), mock);
        let mut options = RequestOptions::default();
        options.set_user_agent("test-only");
        op.reload_with_options(options).await?;
        Ok(())
    }

    #[tokio::test]
    async fn wait_default_policy() -> TestResult {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(running())));
        mock.expect_get_operation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(running().set_done(true))));

        let (delays, hook) = recorder();
        let mut op = handle(running(), mock).with_delay_hook(hook);
        let state = op.wait_until_done().await?;
        assert_eq!(state, &State::Succeeded(None));
        assert_eq!(
            *delays.lock().unwrap(),
            vec![Duration::from_secs(10), Duration::from_secs(13)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn wait_with_options_backoff() -> TestResult {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(running())));
        mock.expect_get_operation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Response::from(failed())));

        let mut options = RequestOptions::default();
        options.set_polling_backoff_policy(
            ExponentialBackoffBuilder::new()
                .with_initial_delay(Duration::from_secs(2))
                .clamp(),
        );
        let (delays, hook) = recorder();
        let mut op = handle(running(), mock)
            .with_options(options)
            .with_delay_hook(hook);
        let state = op.wait_until_done().await?;
        assert!(matches!(state, State::Failed(_)), "{state:?}");
        assert_eq!(*delays.lock().unwrap(), vec![Duration::from_secs(2)]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_deadline() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(7)
            .returning(|_, _| Ok(Response::from(running())));

        let delays = Arc::new(Mutex::new(Vec::new()));
        let recorded = delays.clone();
        let mut op = handle(running(), mock).with_delay_hook(move |d| {
            recorded.lock().unwrap().push(d.as_secs_f64().round() as u64);
            tokio::time::sleep(d)
        });
        let policy = WaitPolicy::default()
            .with_initial_delay(Duration::from_secs(10))
            .with_multiplier(2.0)
            .with_max_delay(Duration::from_secs(300))
            .with_timeout(Duration::from_secs(400));
        let state = op.wait_until_done_with(policy).await?;
        assert_eq!(state, &State::Running);
        assert_eq!(*delays.lock().unwrap(), vec![10, 20, 40, 80, 160, 90]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn wait_short_deadline() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(2)
            .returning(|_, _| Ok(Response::from(running())));
        let start = tokio::time::Instant::now();
        let mut op = handle(running(), mock);
        let policy = WaitPolicy::default().with_timeout(Duration::from_millis(1500));
        let state = op.wait_until_done_with(policy).await?;
        assert_eq!(state, &State::Running);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
        Ok(())
    }

    #[tokio::test]
    async fn wait_propagates_errors() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .times(1)
            .returning(|_, _| Err(Error::io("connection reset")));
        let (delays, hook) = recorder();
        let mut op = handle(running(), mock).with_delay_hook(hook);
        let err = op.wait_until_done().await.unwrap_err();
        assert!(err.is_io(), "{err:?}");
        assert!(delays.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn wait_on_done_operation_sends_no_requests() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_get_operation().times(0);
        let (delays, hook) = recorder();
        let mut op = handle(running().set_done(true), mock).with_delay_hook(hook);
        assert_eq!(op.wait_until_done().await?, &State::Succeeded(None));
        let policy = WaitPolicy::default().with_timeout(Duration::from_secs(1));
        assert_eq!(op.wait_until_done_with(policy).await?, &State::Succeeded(None));
        assert!(delays.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn reload_keeps_terminal_state() -> TestResult {
        let ts = wkt::Timestamp::clamp(42, 0);
        let mut mock = MockOperations::new();
        mock.expect_get_operation().times(1).returning(move |_, _| {
            let metadata = wkt::Any::from_msg(&ts).map_err(Error::ser)?;
            Ok(Response::from(running().set_metadata(metadata)))
        });

        let calls = Arc::new(Mutex::new(0));
        let mut op = handle(failed(), mock);
        let c = calls.clone();
        op.on_done(move |_| *c.lock().unwrap() += 1);
        assert_eq!(*calls.lock().unwrap(), 1);

        let state = op.reload().await?;
        assert!(matches!(state, State::Failed(_)), "{state:?}");
        assert!(op.done());
        assert!(op.is_error());
        assert_eq!(op.operation().error().map(|s| s.code), Some(Code::ResourceExhausted));
        assert_eq!(op.metadata_as::<wkt::Timestamp>()?, Some(ts));
        assert_eq!(*calls.lock().unwrap(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn cancel_and_delete() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_cancel_operation()
            .withf(|r, o| r.name == NAME && o.user_agent().as_deref() == Some("test-only"))
            .times(1)
            .returning(|_, _| Ok(Response::from(())));
        mock.expect_delete_operation()
            .withf(|r, _| r.name == NAME)
            .times(1)
            .returning(|_, _| {
                Err(Error::service(
                    Status::default().set_code(Code::PermissionDenied),
                ))
            });
        let mut options = RequestOptions::default();
        options.set_user_agent("test-only");
        let op = handle(running(), mock).with_options(options);
        op.cancel().await?;
        assert_eq!(op.state(), &State::Running);
        let err = op.delete().await.unwrap_err();
        assert_eq!(err.status().map(|s| s.code), Some(Code::PermissionDenied));
        assert_eq!(op.state(), &State::Running);
        Ok(())
    }

    #[test]
    fn send() {
        static_assertions::assert_impl_all!(Operation: Send, std::fmt::Debug);
    }
}
