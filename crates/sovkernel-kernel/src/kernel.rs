//! The τ-Gate adapter kernel: the propose/commit state machine that
//! interposes on external tool calls.

use std::sync::Mutex as StdMutex;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use sovkernel_crypto::Keystore;
use sovkernel_eventlog::{event_type, EventLog, PartialEvent};
use sovkernel_mandate::Mandate;
use sovkernel_mirror::Mirror;
use sovkernel_receipt::{IssueReceiptParams, Receipt, ReceiptChain};
use sovkernel_types::ActorId;

use crate::error::{KernelError, KernelResult};
use crate::executor::ToolExecutor;
use crate::proposal::{Proposal, ProposalStatus};

/// Construction-time configuration for a [`TauGateKernel`].
pub struct KernelConfig {
    /// The identity this kernel instance signs `COMMITTED`/`PROPOSAL_REJECTED`
    /// acknowledgements and issues receipts under.
    pub adapter_id: ActorId,
    pub executor: Box<dyn ToolExecutor>,
}

/// What a successful [`TauGateKernel::commit`] returns.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub output: Value,
    pub receipt: Receipt,
}

/// One kernel instance: its own keystore, event log, mirror, receipt
/// chain, and proposal map. `propose` and `commit` each hold an exclusive
/// lock for their full duration — per the concurrency model, no
/// fine-grained locking of the event log is attempted.
pub struct TauGateKernel {
    adapter_id: ActorId,
    keystore: Keystore,
    event_log: EventLog,
    mirror: Mirror,
    receipt_chain: StdMutex<ReceiptChain>,
    proposals: DashMap<String, Proposal>,
    executor: Box<dyn ToolExecutor>,
    lock: AsyncMutex<()>,
}

impl TauGateKernel {
    pub fn new(config: KernelConfig) -> Self {
        let keystore = Keystore::new();
        keystore.ensure_key(&config.adapter_id);
        Self {
            adapter_id: config.adapter_id,
            keystore,
            event_log: EventLog::new(),
            mirror: Mirror::new(),
            receipt_chain: StdMutex::new(ReceiptChain::new()),
            proposals: DashMap::new(),
            executor: config.executor,
            lock: AsyncMutex::new(()),
        }
    }

    pub fn adapter_id(&self) -> &ActorId {
        &self.adapter_id
    }

    pub fn keystore(&self) -> &Keystore {
        &self.keystore
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn receipt_chain_proof(&self) -> sovkernel_receipt::ReceiptResult<sovkernel_receipt::ChainProof> {
        self.receipt_chain.lock().expect("receipt chain lock poisoned").get_chain_proof()
    }

    pub fn get_proposal(&self, proposal_id: &str) -> Option<Proposal> {
        self.proposals.get(proposal_id).map(|p| p.clone())
    }

    /// No verification occurs here — the agent is free to propose
    /// anything; execution authority is asserted only at [`Self::commit`].
    pub async fn propose(&self, agent: ActorId, action: impl Into<String>, args: Value, estimated_cost: Option<i64>) -> KernelResult<Proposal> {
        let _guard = self.lock.lock().await;
        let action = action.into();

        self.keystore.ensure_key(&agent);

        let mirror_ref = self.mirror.capture(agent.to_string(), action.clone(), None)?;

        let event_id = self.event_log.append(
            PartialEvent::new(
                event_type::SUGGESTION,
                json!({
                    "mirrorRef": mirror_ref,
                    "agentId": agent.to_string(),
                    "proposedAction": action,
                    "estimatedCost": estimated_cost,
                }),
                agent,
            ),
            &self.keystore,
        )?;

        let proposal = Proposal {
            id: format!("proposal_{}", Uuid::now_v7()),
            action,
            args,
            mirror_ref,
            event_id,
            status: ProposalStatus::Pending,
            created_at: Utc::now(),
        };
        self.proposals.insert(proposal.id.clone(), proposal.clone());
        tracing::debug!(proposal_id = %proposal.id, "proposal recorded");
        Ok(proposal)
    }

    /// Runs the three gates in order, short-circuiting on the first
    /// failure: signature/validity, explicit revocation recheck, scope.
    /// On success, executes the tool, issues a receipt, and appends it to
    /// the receipt chain.
    pub async fn commit(&self, proposal_id: &str, mandate: &Mandate) -> KernelResult<CommitOutcome> {
        let _guard = self.lock.lock().await;

        let mut proposal = self
            .proposals
            .get(proposal_id)
            .map(|p| p.clone())
            .ok_or(KernelError::ProposalNotFound)?;

        match proposal.status {
            ProposalStatus::Committed => return Err(KernelError::ProposalCommitted),
            ProposalStatus::Rejected => return Err(KernelError::ProposalRejected),
            ProposalStatus::Pending => {}
        }

        let verification = sovkernel_mandate::verify(mandate, &self.keystore, None);
        if !verification.valid {
            tracing::warn!(proposal_id, errors = ?verification.errors, "mandate verification failed");
            self.reject(&mut proposal, "INVALID_MANDATE", &verification.errors)?;
            return Err(KernelError::InvalidMandate(verification.errors.join(", ")));
        }

        if self.event_log.is_mandate_revoked(&mandate.mandate_id.to_string()) {
            tracing::warn!(proposal_id, "mandate revoked");
            let detail = vec!["revoked".to_string()];
            self.reject(&mut proposal, "REVOKED_MANDATE", &detail)?;
            return Err(KernelError::RevokedMandate(detail.join(", ")));
        }

        if !mandate.is_action_allowed(&proposal.action) {
            tracing::warn!(proposal_id, action = %proposal.action, "scope violation");
            let detail = vec![format!("action '{}' not in scope", proposal.action)];
            self.reject(&mut proposal, "SCOPE_VIOLATION", &detail)?;
            return Err(KernelError::ScopeViolation(detail.join(", ")));
        }

        self.keystore.ensure_key(&mandate.delegate);
        self.event_log.append(
            PartialEvent::new(
                event_type::COMMITTED,
                json!({
                    "proposalId": proposal.id,
                    "action": proposal.action,
                    "mandateId": mandate.mandate_id.to_string(),
                }),
                mandate.delegate.clone(),
            ),
            &self.keystore,
        )?;

        let output = match self.executor.execute(&proposal.action, &proposal.args).await {
            Ok(output) => output,
            Err(message) => {
                self.event_log.append(
                    PartialEvent::new(
                        event_type::EXECUTION_FAILED,
                        json!({"proposalId": proposal.id, "error": message}),
                        self.adapter_id.clone(),
                    ),
                    &self.keystore,
                )?;
                return Err(KernelError::ExecutionFailed(message));
            }
        };

        self.keystore.ensure_key(&mandate.issuer);
        let response_hash = sovkernel_canon::hash(&output)?;
        let receipt = sovkernel_receipt::issue(
            IssueReceiptParams {
                mandate_id: Some(mandate.mandate_id),
                actor: self.adapter_id.clone(),
                action: proposal.action.clone(),
                request_hash: proposal.mirror_ref.clone(),
                response_hash: Some(response_hash),
                provider_metadata: None,
                mirror_ref: proposal.mirror_ref.clone(),
            },
            &self.keystore,
            &self.adapter_id.key_id(),
        )?;

        {
            let mut chain = self.receipt_chain.lock().expect("receipt chain lock poisoned");
            chain.add(receipt.receipt_id, &receipt)?;
        }

        self.event_log.append(
            PartialEvent::new(
                event_type::RECEIPT_ISSUED,
                json!({
                    "receiptId": receipt.receipt_id.to_string(),
                    "mandateId": mandate.mandate_id.to_string(),
                    "proposalId": proposal.id,
                }),
                mandate.issuer.clone(),
            ),
            &self.keystore,
        )?;

        proposal.status = ProposalStatus::Committed;
        self.proposals.insert(proposal.id.clone(), proposal.clone());

        Ok(CommitOutcome { output, receipt })
    }

    fn reject(&self, proposal: &mut Proposal, reason_tag: &str, errors: &[String]) -> KernelResult<()> {
        proposal.status = ProposalStatus::Rejected;
        self.proposals.insert(proposal.id.clone(), proposal.clone());
        self.event_log.append(
            PartialEvent::new(
                event_type::PROPOSAL_REJECTED,
                json!({"proposalId": proposal.id, "reason": reason_tag, "errors": errors}),
                self.adapter_id.clone(),
            ),
            &self.keystore,
        )?;
        Ok(())
    }
}
