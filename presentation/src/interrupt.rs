//! Ctrl-C handling around a single query

use chorus_application::{AnswerQueryUseCase, ProgressNotifier};
use chorus_domain::{DomainError, FinalResponse, Query};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Answer `query`, cancelling the in-flight backends when Ctrl-C arrives
///
/// Returns [`DomainError::Cancelled`] if interrupted.
pub async fn answer_until_interrupted(
    use_case: &AnswerQueryUseCase,
    query: &Query,
    progress: &dyn ProgressNotifier,
) -> Result<FinalResponse, DomainError> {
    let token = CancellationToken::new();
    let answer = use_case.answer_with_cancellation(query, &token, progress);
    tokio::pin!(answer);

    tokio::select! {
        result = &mut answer => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling query");
            token.cancel();
            answer.await
        }
    }
}
