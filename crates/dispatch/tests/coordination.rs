//! End-to-end tests wiring the coordinator to real responder actors.
//!
//! Run with:
//!   cargo test -p dispatch --test coordination

use std::sync::Arc;
use std::time::Duration;

use dispatch::{
    DispatchConfig, InboundReply, PriorityOptimizer, ReportState, ResponseOutcome, StatusTopic,
    TrackedReport, TriageSystem,
};
use facility_selector::Inventory;
use knowledge_base::KnowledgeBase;
use responders::{ResponderConfig, ResponderStatus};
use triage_core::{
    EmergencyReport, EmergencyResponse, EmergencyType, InboundContent, ReportDraft,
    ResponderCategory, SelectionOutcome,
};

fn start() -> TriageSystem {
    TriageSystem::start(
        Arc::new(KnowledgeBase::builtin().unwrap()),
        Inventory::builtin().unwrap(),
        &DispatchConfig::default(),
        &ResponderConfig::default().without_monitor(),
    )
}

/// Poll until the report leaves the awaiting states.
async fn settled(system: &TriageSystem, report_id: &str) -> TrackedReport {
    for _ in 0..200 {
        let tracked = system.coordinator().report(report_id).await.unwrap().unwrap();
        if !tracked.state.is_awaiting() {
            return tracked;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("report {} never settled", report_id);
}

async fn status(system: &TriageSystem, category: ResponderCategory) -> ResponderStatus {
    system
        .responders()
        .handle(category)
        .unwrap()
        .status()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_chemical_report_confirmed_by_all_responders() {
    let system = start();
    let receipt = system
        .coordinator()
        .submit(
            ReportDraft::text("Chemical spill in warehouse, toxic fumes spreading, evacuation needed")
                .with_id("EM-CHEM")
                .with_affected_count(30),
        )
        .await
        .unwrap();

    assert_eq!(receipt.classification.inferred_type, EmergencyType::Chemical);
    assert_eq!(receipt.classification.severity_score, 7.0);
    assert_eq!(receipt.dispatched, ResponderCategory::ALL.to_vec());

    let tracked = settled(&system, "EM-CHEM").await;
    assert_eq!(tracked.state, ReportState::Confirmed);
    assert_eq!(tracked.records.len(), 3);

    let medical = &tracked.records[&ResponderCategory::Medical];
    assert_eq!(medical.response.teams_assigned, 2);
    let shelter = &tracked.records[&ResponderCategory::Shelter];
    assert_eq!(shelter.response.teams_assigned, 30);
    let resources = &tracked.records[&ResponderCategory::ResourceAllocation];
    assert_eq!(resources.response.teams_assigned, 3);

    let ResponderStatus::Medical(medical) = status(&system, ResponderCategory::Medical).await else {
        panic!("expected medical status");
    };
    assert_eq!(medical.ambulances_available, 13);
    assert_eq!(medical.ambulances_dispatched, 2);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shelter_best_fit_through_actor() {
    let system = start();
    let shelter = system
        .responders()
        .handle(ResponderCategory::Shelter)
        .unwrap()
        .clone();

    let report = EmergencyReport::new("EM-FLOOD", EmergencyType::Flood, 7.0, "flood", 80);
    let reply = shelter.handle(report).await.unwrap();
    assert_eq!(reply.outcome.facility(), Some("Convention Center"));

    let ResponderStatus::Shelter(status) = status(&system, ResponderCategory::Shelter).await else {
        panic!("expected shelter status");
    };
    let loads: Vec<u32> = status.shelters.iter().map(|s| s.current_load).collect();
    assert_eq!(loads, vec![120, 200, 530]);

    // The direct call still reports to the coordinator, which never
    // dispatched EM-FLOOD and ignores it.
    assert!(system.coordinator().report("EM-FLOOD").await.unwrap().is_none());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_critical_medical_dispatch_reserves_ambulances() {
    let system = start();
    system
        .coordinator()
        .submit(ReportDraft::text("mass accident, critical bleeding").with_id("EM-MED"))
        .await
        .unwrap();
    let tracked = settled(&system, "EM-MED").await;
    assert_eq!(tracked.state, ReportState::Confirmed);

    let ResponderStatus::Medical(medical) = status(&system, ResponderCategory::Medical).await else {
        panic!("expected medical status");
    };
    assert_eq!(medical.ambulances_available, 12);
    assert_eq!(medical.ambulances_dispatched, 3);
    let ecu = medical
        .hospitals
        .iter()
        .find(|h| h.name == "Emergency Care Unit")
        .unwrap();
    assert_eq!(ecu.icu_available, 4);

    let returned = system
        .responders()
        .handle(ResponderCategory::Medical)
        .unwrap()
        .release(3)
        .await
        .unwrap();
    assert_eq!(returned, 3);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_query_and_summary() {
    let system = start();
    system
        .coordinator()
        .submit(ReportDraft::text("smoke and flames, people trapped").with_id("EM-FIRE"))
        .await
        .unwrap();
    settled(&system, "EM-FIRE").await;

    let report = system.coordinator().status_query("how many ambulances?").await.unwrap();
    assert_eq!(StatusTopic::parse("how many ambulances?"), StatusTopic::Responder(ResponderCategory::Medical));
    assert_eq!(report.responders.len(), 1);
    assert!(matches!(report.responders[0], ResponderStatus::Medical(_)));
    assert_eq!(report.summary.total_reports, 1);
    assert_eq!(report.summary.active_count, 0);

    let everything = system.coordinator().status_query("status").await.unwrap();
    assert_eq!(everything.responders.len(), 3);
    let text = everything.render();
    assert!(text.contains("Shelters:"));
    assert!(text.contains("Central Depot"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_session_text_submits_report() {
    let system = start();
    let coordinator = system.coordinator();

    let prompt = coordinator.inbound("citizen", InboundContent::SessionStart).await.unwrap();
    assert!(matches!(prompt, InboundReply::Prompt(_)));

    let reply = coordinator
        .inbound("citizen", InboundContent::text("Flood water rising near the dam"))
        .await
        .unwrap();
    let InboundReply::Submitted(receipt) = reply else {
        panic!("expected submission");
    };
    assert_eq!(receipt.classification.inferred_type, EmergencyType::Flood);
    assert_eq!(receipt.state, ReportState::Dispatched);

    let summary = coordinator.summary().await.unwrap();
    assert_eq!(summary.citizens_online, 1);

    let ended = coordinator.inbound("citizen", InboundContent::SessionEnd).await.unwrap();
    assert!(matches!(ended, InboundReply::SessionEnded(Some(ref s)) if s.messages == 1));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_responder_is_ignored() {
    let system = start();
    system
        .coordinator()
        .submit(ReportDraft::text("man unconscious").with_id("EM-1"))
        .await
        .unwrap();

    let outcome = system
        .coordinator()
        .record_response("rogue", EmergencyResponse::new("EM-1", "spoof", 0, ""))
        .await
        .unwrap();
    assert_eq!(outcome, ResponseOutcome::UnknownResponder);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rank_batch_collaboration() {
    let optimizer = PriorityOptimizer::new(Arc::new(KnowledgeBase::builtin().unwrap()));
    let batch = vec![
        EmergencyReport::new("EM-A", EmergencyType::Flood, 6.0, "flood", 80),
        EmergencyReport::new("EM-B", EmergencyType::Medical, 8.0, "injuries", 15),
    ];
    let ranked = optimizer.rank(&batch);
    assert_eq!(ranked[0].collaborate_with, vec!["EM-B".to_string()]);
    assert_eq!(ranked[1].collaborate_with, vec!["EM-A".to_string()]);
}

#[tokio::test]
async fn test_depot_shortage_reported_not_thrown() {
    let system = start();
    let depots = system
        .responders()
        .handle(ResponderCategory::ResourceAllocation)
        .unwrap()
        .clone();

    // Central Depot holds 5 boats; HIGH floods take 2 each.
    let mut outcomes = Vec::new();
    for i in 0..3 {
        let report = EmergencyReport::new(format!("EM-{}", i), EmergencyType::Flood, 6.0, "flood", 1);
        outcomes.push(depots.handle(report).await.unwrap().outcome);
    }
    assert!(outcomes[0].is_allocated());
    assert!(outcomes[1].is_allocated());
    assert!(matches!(
        outcomes[2],
        SelectionOutcome::Shortage { requested: 2, .. }
    ));

    system.shutdown().await.unwrap();
}
