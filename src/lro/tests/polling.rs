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

#[cfg(test)]
mod tests {
    use gax::Result;
    use gax::error::rpc::{Code, Status};
    use gax::options::RequestOptions;
    use gax::response::Response;
    use google_cloud_lro::{Operation, Payload, Results, State, WaitPolicy};
    use longrunning::client::Operations;
    use longrunning::model;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    /// Returns the canned operations in order, repeating the last one.
    #[derive(Debug, Default)]
    struct Fake {
        polls: Mutex<VecDeque<model::Operation>>,
        names: Arc<Mutex<Vec<String>>>,
    }

    impl Fake {
        fn new<I: IntoIterator<Item = model::Operation>>(polls: I) -> Self {
            Self {
                polls: Mutex::new(polls.into_iter().collect()),
                ..Default::default()
            }
        }
    }

    impl longrunning::stub::Operations for Fake {
        async fn get_operation(
            &self,
            req: model::GetOperationRequest,
            _options: RequestOptions,
        ) -> Result<Response<model::Operation>> {
            self.names.lock().unwrap().push(req.name);
            let mut polls = self.polls.lock().unwrap();
            let op = if polls.len() > 1 {
                polls.pop_front()
            } else {
                polls.front().cloned()
            };
            Ok(Response::from(op.unwrap_or_default()))
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn running(name: &str) -> model::Operation {
        model::Operation::new().set_name(name)
    }

    #[test_case(1, State::Succeeded(None); "done on first poll")]
    #[test_case(4, State::Succeeded(None); "done on fourth poll")]
    #[tokio::test(start_paused = true)]
    async fn wait_until_done(polls: usize, want: State) -> TestResult {
        init_tracing();
        let name = "projects/p/locations/l/operations/wait";
        let mut responses = vec![running(name); polls - 1];
        responses.push(running(name).set_done(true));
        let fake = Fake::new(responses);
        let names = fake.names.clone();

        let mut op = Operation::new(running(name), Operations::from_stub(fake));
        let state = op.wait_until_done().await?;
        assert_eq!(state, &want);
        assert_eq!(names.lock().unwrap().len(), polls);
        assert!(names.lock().unwrap().iter().all(|n| n == name));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn wait_with_policy_times_out() -> TestResult {
        init_tracing();
        let name = "projects/p/locations/l/operations/slow";
        let mut op = Operation::new(running(name), Operations::from_stub(Fake::new([running(name)])));
        let start = tokio::time::Instant::now();
        let policy = WaitPolicy::default()
            .with_initial_delay(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(30));
        let state = op.wait_until_done_with(policy).await?;
        assert_eq!(state, &State::Running);
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(31));
        Ok(())
    }

    #[tokio::test]
    async fn failed_operation() -> TestResult {
        init_tracing();
        let name = "projects/p/locations/l/operations/failed";
        let status = Status::default()
            .set_code(Code::FailedPrecondition)
            .set_message("bucket is not empty");
        let fake = Fake::new([running(name).set_done(true).set_error(status.clone())]);

        let done = Arc::new(Mutex::new(None));
        let mut op = Operation::new(running(name), Operations::from_stub(fake));
        let d = done.clone();
        op.on_done(move |op| *d.lock().unwrap() = op.error().cloned());

        let state = op.reload().await?;
        assert_eq!(state, &State::Failed(status.clone()));
        assert_eq!(*done.lock().unwrap(), Some(status.clone()));
        assert!(op.results().is_some_and(|r| r.is_error()));
        match op.results() {
            Some(Results::Error(s)) => assert_eq!(s, &status),
            r => panic!("unexpected results {r:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn typed_response() -> TestResult {
        init_tracing();
        let name = "projects/p/locations/l/operations/typed";
        let ts = wkt::Timestamp::clamp(1747388772, 0);
        let metadata = wkt::Any::from_msg(&wkt::Empty::default())?;
        let fake = Fake::new([running(name)
            .set_metadata(metadata)
            .set_done(true)
            .set_response(wkt::Any::from_msg(&ts)?)]);

        let mut op = Operation::new(running(name), Operations::from_stub(fake))
            .with_result_type::<wkt::Timestamp>()
            .with_metadata_type::<wkt::Empty>();
        op.reload().await?;
        let response = op.response().expect("operation has a response");
        assert!(response.is_message());
        assert_eq!(response.downcast_ref::<wkt::Timestamp>(), Some(&ts));
        assert!(matches!(
            op.metadata(),
            Some(Payload::Message(m)) if m.is::<wkt::Empty>()
        ));
        assert_eq!(op.response_as::<wkt::Timestamp>()?, Some(ts));
        Ok(())
    }
}
