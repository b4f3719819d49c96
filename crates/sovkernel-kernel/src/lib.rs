pub mod error;
pub mod executor;
pub mod kernel;
pub mod proposal;

pub use error::{KernelError, KernelResult};
pub use executor::ToolExecutor;
pub use kernel::{CommitOutcome, KernelConfig, TauGateKernel};
pub use proposal::{Proposal, ProposalStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use sovkernel_mandate::{create, sign, CreateMandateParams};
    use sovkernel_types::{ActorId, Scope, Validity};

    struct EchoExecutor;

    #[async_trait]
    impl ToolExecutor for EchoExecutor {
        async fn execute(&self, action: &str, args: &Value) -> Result<Value, String> {
            Ok(json!({"action": action, "echoed": args}))
        }
    }

    fn issuer() -> ActorId {
        ActorId::user("alice").unwrap()
    }

    fn delegate() -> ActorId {
        ActorId::agent("bot-1").unwrap()
    }

    fn new_kernel() -> TauGateKernel {
        TauGateKernel::new(KernelConfig {
            adapter_id: ActorId::adapter("main").unwrap(),
            executor: Box::new(EchoExecutor),
        })
    }

    #[tokio::test]
    async fn happy_path_commits_and_issues_receipt() {
        let kernel = new_kernel();
        let issuer = issuer();
        let key_id = kernel.keystore().ensure_key(&issuer);
        let unsigned = create(CreateMandateParams {
            issuer: issuer.clone(),
            delegate: delegate(),
            scope: Scope::new(vec!["invoke:model".to_string()], vec!["agent:openai".to_string()])
                .with_budget(1000, "USD"),
            validity: Validity::unbounded(),
            constraints: Default::default(),
        });
        let mandate = sign(&unsigned, kernel.keystore(), &key_id).unwrap();

        let proposal = kernel
            .propose(delegate(), "invoke:model", json!({"prompt": "hi"}), Some(10))
            .await
            .unwrap();

        let outcome = kernel.commit(&proposal.id, &mandate).await.unwrap();
        assert_eq!(outcome.output["action"], "invoke:model");
        assert!(sovkernel_receipt::verify(&outcome.receipt, kernel.keystore()).valid);
        assert_eq!(kernel.event_log().length(), 3);
    }

    #[tokio::test]
    async fn committing_twice_fails_proposal_committed() {
        let kernel = new_kernel();
        let issuer = issuer();
        let key_id = kernel.keystore().ensure_key(&issuer);
        let unsigned = create(CreateMandateParams {
            issuer: issuer.clone(),
            delegate: delegate(),
            scope: Scope::new(vec!["*".to_string()], vec!["*".to_string()]),
            validity: Validity::unbounded(),
            constraints: Default::default(),
        });
        let mandate = sign(&unsigned, kernel.keystore(), &key_id).unwrap();

        let proposal = kernel.propose(delegate(), "read_file", json!({}), None).await.unwrap();
        kernel.commit(&proposal.id, &mandate).await.unwrap();

        let err = kernel.commit(&proposal.id, &mandate).await.unwrap_err();
        assert_eq!(err.to_string(), "PROPOSAL_COMMITTED");
    }

    #[tokio::test]
    async fn unknown_proposal_fails_not_found() {
        let kernel = new_kernel();
        let issuer = issuer();
        let key_id = kernel.keystore().ensure_key(&issuer);
        let unsigned = create(CreateMandateParams {
            issuer: issuer.clone(),
            delegate: delegate(),
            scope: Scope::new(vec!["*".to_string()], vec!["*".to_string()]),
            validity: Validity::unbounded(),
            constraints: Default::default(),
        });
        let mandate = sign(&unsigned, kernel.keystore(), &key_id).unwrap();

        let err = kernel.commit("proposal_does-not-exist", &mandate).await.unwrap_err();
        assert_eq!(err.to_string(), "PROPOSAL_NOT_FOUND");
    }
}
