//! Per-email atomicity of ledger operations under parallel callers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use crate::errors::OtpRejection;
use crate::services::clock::ManualClock;
use crate::services::otp::{OtpLedger, VerifyOutcome};

use super::mocks::{ledger, test_config, wrong_code, SlowHasher};

const THREADS: usize = 16;

#[test]
fn test_parallel_wrong_codes_never_exceed_attempt_cap() {
    let (ledger, _) = ledger();
    let code = ledger.issue("a@b.com").unwrap();
    let wrong = wrong_code(&code);

    let invalid = AtomicUsize::new(0);
    let exhausted = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                match ledger.verify("a@b.com", &wrong).unwrap() {
                    VerifyOutcome::Rejected(OtpRejection::InvalidCode) => {
                        invalid.fetch_add(1, Ordering::SeqCst);
                    }
                    VerifyOutcome::Rejected(OtpRejection::AttemptsExhausted) => {
                        exhausted.fetch_add(1, Ordering::SeqCst);
                    }
                    other => panic!("unexpected outcome: {:?}", other),
                }
            });
        }
    });

    assert_eq!(invalid.load(Ordering::SeqCst), 6);
    assert_eq!(exhausted.load(Ordering::SeqCst), THREADS - 6);
    assert_eq!(ledger.status("a@b.com").unwrap().unwrap().attempts, 6);
}

#[test]
fn test_parallel_correct_codes_verify_once() {
    let (ledger, _) = ledger();
    let code = ledger.issue("a@b.com").unwrap();

    let verified = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                match ledger.verify("a@b.com", &code).unwrap() {
                    VerifyOutcome::Verified => {
                        verified.fetch_add(1, Ordering::SeqCst);
                    }
                    VerifyOutcome::Rejected(rejection) => {
                        assert_eq!(rejection, OtpRejection::NoActiveChallenge);
                    }
                }
            });
        }
    });

    assert_eq!(verified.load(Ordering::SeqCst), 1);
}

#[test]
fn test_parallel_resends_respect_limit() {
    let (ledger, _) = ledger();
    ledger.issue("a@b.com").unwrap();

    let issued = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                if ledger.resend("a@b.com").unwrap().is_issued() {
                    issued.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(issued.load(Ordering::SeqCst), 5);
    assert_eq!(ledger.status("a@b.com").unwrap().unwrap().resend_count, 5);
}

#[test]
fn test_independent_emails_do_not_interfere() {
    let (ledger, _) = ledger();
    let emails: Vec<String> = (0..THREADS).map(|i| format!("user{}@b.com", i)).collect();
    let codes: Vec<String> = emails.iter().map(|e| ledger.issue(e).unwrap()).collect();

    thread::scope(|scope| {
        for (email, code) in emails.iter().zip(codes.iter()) {
            let ledger = &ledger;
            scope.spawn(move || {
                ledger.verify(email, &wrong_code(code)).unwrap();
                assert!(ledger.verify(email, code).unwrap().is_verified());
            });
        }
    });

    assert_eq!(ledger.purge_expired(), THREADS);
}

const VERIFY_DELAY: Duration = Duration::from_millis(600);
const RESPONSIVE: Duration = Duration::from_millis(200);

fn slow_ledger() -> (OtpLedger<SlowHasher>, Arc<SlowHasher>) {
    let hasher = Arc::new(SlowHasher::new(VERIFY_DELAY));
    let ledger = OtpLedger::new(
        hasher.clone(),
        Arc::new(ManualClock::starting_now()),
        test_config(),
    );
    (ledger, hasher)
}

fn other_emails(ledger: &OtpLedger<SlowHasher>) -> Vec<String> {
    let emails: Vec<String> = (0..64).map(|i| format!("other{}@b.com", i)).collect();
    for email in &emails {
        ledger.issue(email).unwrap();
    }
    emails
}

#[test]
fn test_resend_waiting_on_slow_verify_does_not_block_other_emails() {
    let (ledger, hasher) = slow_ledger();
    let code = ledger.issue("a@b.com").unwrap();
    let others = other_emails(&ledger);

    thread::scope(|scope| {
        let verifying = scope.spawn(|| ledger.verify("a@b.com", &wrong_code(&code)).unwrap());
        hasher.wait_until_verifying();

        let resending = scope.spawn(|| ledger.resend("a@b.com").unwrap());
        thread::sleep(Duration::from_millis(50));

        let mut worst = Duration::ZERO;
        for email in &others {
            let started = Instant::now();
            assert!(ledger.status(email).unwrap().is_some());
            worst = worst.max(started.elapsed());
        }
        assert!(worst < RESPONSIVE, "status() on another email took {:?}", worst);

        assert_eq!(
            verifying.join().unwrap(),
            VerifyOutcome::Rejected(OtpRejection::InvalidCode)
        );
        assert!(resending.join().unwrap().is_issued());
    });

    let status = ledger.status("a@b.com").unwrap().unwrap();
    assert_eq!(status.resend_count, 1);
    assert_eq!(status.attempts, 0);
}

#[test]
fn test_purge_skips_challenge_under_verification() {
    let (ledger, hasher) = slow_ledger();
    let code = ledger.issue("a@b.com").unwrap();
    let others = other_emails(&ledger);

    thread::scope(|scope| {
        let verifying = scope.spawn(|| ledger.verify("a@b.com", &code).unwrap());
        hasher.wait_until_verifying();

        let started = Instant::now();
        assert_eq!(ledger.purge_expired(), 0);
        assert!(started.elapsed() < RESPONSIVE, "purge waited {:?}", started.elapsed());
        assert!(ledger.status(&others[0]).unwrap().is_some());

        assert!(verifying.join().unwrap().is_verified());
    });

    // Consumed now, so the next pass drops it
    assert_eq!(ledger.purge_expired(), 1);
    assert_eq!(ledger.len(), others.len());
}
