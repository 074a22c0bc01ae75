#[cfg(test)]
mod tests {
    use crate::blockchain::wallet::{lamports_to_sol, sol_to_lamports};
    use crate::blockchain::{
        create_wallet, derive_keypair, fetch_balance, request_test_funds, transfer, try_fetch_balance,
        WalletError,
    };
    use crate::config::DEVNET_URL;
    use crate::models::{TransactionKind, TransactionRecord, WalletRecord};
    use crate::tests::{memory_storage, MockCluster, FEE_LAMPORTS};
    use solana_sdk::native_token::LAMPORTS_PER_SOL;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signer;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_lamport_conversion() {
        assert_eq!(sol_to_lamports(1.0), LAMPORTS_PER_SOL);
        assert_eq!(sol_to_lamports(0.1), 100_000_000);
        assert_eq!(sol_to_lamports(-1.0), 0);
        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
    }

    #[test]
    fn test_create_and_derive_round_trip() {
        let storage = memory_storage();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();

        assert!(record.transactions.is_empty());
        assert_eq!(record.network, DEVNET_URL);
        assert_eq!(storage.load().unwrap(), Some(record.clone()));

        let first = derive_keypair(&record).unwrap();
        let stored = storage.load().unwrap().unwrap();
        let second = derive_keypair(&stored).unwrap();
        assert_eq!(first.pubkey(), second.pubkey());
    }

    #[test]
    fn test_create_discards_previous_wallet() {
        let storage = memory_storage();
        let old = create_wallet(&storage, DEVNET_URL).unwrap();
        storage
            .prepend_transaction(TransactionRecord::airdrop("old-sig".to_string(), 1, 1.0))
            .unwrap();

        let new = create_wallet(&storage, DEVNET_URL).unwrap();
        let stored = storage.load().unwrap().unwrap();
        assert_ne!(old.secret_key_encoded, new.secret_key_encoded);
        assert!(stored.transactions.is_empty());
    }

    #[test]
    fn test_derive_rejects_corrupt_key() {
        let not_base58 = WalletRecord::new("0OIl".to_string(), DEVNET_URL.to_string());
        assert!(matches!(derive_keypair(&not_base58), Err(WalletError::Decoding(_))));

        let too_short = WalletRecord::new(bs58::encode([1u8; 10]).into_string(), DEVNET_URL.to_string());
        assert!(matches!(derive_keypair(&too_short), Err(WalletError::Decoding(_))));
    }

    #[tokio::test]
    async fn test_fetch_balance_reads_zero_on_failure() {
        let cluster = MockCluster::new();
        let address = Pubkey::new_unique();
        cluster.credit(&address, 2 * LAMPORTS_PER_SOL);

        assert_eq!(fetch_balance(&*cluster, &address).await, 2.0);

        cluster.set_unavailable(true);
        assert_eq!(fetch_balance(&*cluster, &address).await, 0.0);
        assert!(try_fetch_balance(&*cluster, &address).await.is_err());
    }

    #[tokio::test]
    async fn test_request_test_funds_records_airdrop() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let address = derive_keypair(&record).unwrap().pubkey();

        let signature = request_test_funds(&storage, &*cluster, &address, 1.0)
            .await
            .expect("airdrop should succeed");

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.transactions.len(), 1);
        let tx = &stored.transactions[0];
        assert_eq!(tx.signature, signature.to_string());
        assert_eq!(tx.kind, TransactionKind::Airdrop);
        assert_eq!(tx.amount, 1.0);
        assert_eq!(tx.counterparty, None);
        assert!(tx.timestamp > 0);
        assert_eq!(cluster.lamports_of(&address), LAMPORTS_PER_SOL);
    }

    #[tokio::test]
    async fn test_request_test_funds_failures_change_nothing() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let address = derive_keypair(&record).unwrap().pubkey();

        cluster.set_unavailable(true);
        assert_eq!(request_test_funds(&storage, &*cluster, &address, 1.0).await, None);

        cluster.set_unavailable(false);
        cluster.set_unconfirmed(true);
        assert_eq!(request_test_funds(&storage, &*cluster, &address, 1.0).await, None);

        assert_eq!(request_test_funds(&storage, &*cluster, &address, 0.0).await, None);

        assert!(storage.load().unwrap().unwrap().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_records_send() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let keypair = derive_keypair(&record).unwrap();
        request_test_funds(&storage, &*cluster, &keypair.pubkey(), 1.0)
            .await
            .unwrap();

        let destination = Pubkey::new_unique();
        let before = storage.load().unwrap().unwrap().transactions.len();
        let signature = transfer(&storage, &*cluster, &keypair, &destination.to_string(), 0.25)
            .await
            .expect("transfer should succeed");

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.transactions.len(), before + 1);
        let tx = &stored.transactions[0];
        assert_eq!(tx.kind, TransactionKind::Send);
        assert_eq!(tx.signature, signature.to_string());
        assert_eq!(tx.amount, 0.25);
        assert_eq!(tx.counterparty.as_deref(), Some(destination.to_string().as_str()));
        assert_eq!(cluster.lamports_of(&destination), sol_to_lamports(0.25));
    }

    #[tokio::test]
    async fn test_transfer_rejects_malformed_destination_before_network() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let keypair = derive_keypair(&record).unwrap();

        for destination in ["", "short", "0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl"] {
            assert_eq!(transfer(&storage, &*cluster, &keypair, destination, 0.1).await, None);
        }
        assert_eq!(cluster.submitted_transactions.load(Ordering::SeqCst), 0);
        assert!(storage.load().unwrap().unwrap().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_rejected_by_cluster() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let keypair = derive_keypair(&record).unwrap();

        // Unfunded account
        let destination = Pubkey::new_unique().to_string();
        assert_eq!(transfer(&storage, &*cluster, &keypair, &destination, 0.1).await, None);
        assert!(storage.load().unwrap().unwrap().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_resubmitted_transfer_is_a_second_transfer() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let keypair = derive_keypair(&record).unwrap();
        request_test_funds(&storage, &*cluster, &keypair.pubkey(), 1.0)
            .await
            .unwrap();

        let destination = Pubkey::new_unique();
        let first = transfer(&storage, &*cluster, &keypair, &destination.to_string(), 0.1).await;
        let second = transfer(&storage, &*cluster, &keypair, &destination.to_string(), 0.1).await;

        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second);
        assert_eq!(cluster.lamports_of(&destination), sol_to_lamports(0.2));
        assert_eq!(storage.load().unwrap().unwrap().transactions.len(), 3);
    }

    #[tokio::test]
    async fn test_airdrop_then_transfer_scenario() {
        let storage = memory_storage();
        let cluster = MockCluster::new();
        let record = create_wallet(&storage, DEVNET_URL).unwrap();
        let keypair = derive_keypair(&record).unwrap();
        let address = keypair.pubkey();

        request_test_funds(&storage, &*cluster, &address, 1.0).await.unwrap();
        assert_eq!(fetch_balance(&*cluster, &address).await, 1.0);
        assert_eq!(storage.load().unwrap().unwrap().transactions.len(), 1);

        let destination = Pubkey::new_unique().to_string();
        transfer(&storage, &*cluster, &keypair, &destination, 0.5).await.unwrap();

        let balance = fetch_balance(&*cluster, &address).await;
        let expected = 0.5 - lamports_to_sol(FEE_LAMPORTS);
        assert!((balance - expected).abs() < 1e-9, "balance was {}", balance);

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.transactions.len(), 2);
        assert_eq!(stored.transactions[0].kind, TransactionKind::Send);
        assert_eq!(stored.transactions[0].amount, 0.5);
        assert_eq!(stored.transactions[0].counterparty, Some(destination));
        assert_eq!(stored.transactions[1].kind, TransactionKind::Airdrop);
    }
}
