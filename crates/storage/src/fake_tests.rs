// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_ledger_records_calls_and_shares_state() {
    let ledger = FakeLedger::with_recorded(["a.gif"]);
    let mut handle = ledger.clone();

    assert!(handle.contains(&ReplayId::new("a.gif")).unwrap());
    assert!(handle.record(&ReplayId::new("b.gif")).unwrap());
    assert!(!handle.record(&ReplayId::new("b.gif")).unwrap());

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.calls().len(), 3);
    assert_eq!(
        ledger.calls()[0],
        LedgerCall::Contains(ReplayId::new("a.gif"))
    );
}

#[test]
fn fake_ledger_injects_failures() {
    let mut ledger = FakeLedger::new();
    ledger.fail_contains(true);
    ledger.fail_record(true);

    assert!(matches!(
        ledger.contains(&ReplayId::new("a.gif")),
        Err(LedgerError::Query { .. })
    ));
    assert!(matches!(
        ledger.record(&ReplayId::new("a.gif")),
        Err(LedgerError::Write { .. })
    ));
    assert!(ledger.recorded().is_empty());
}
