//! The client facade.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use starknet_crypto::FieldElement;
use tracing::{debug, instrument, warn};

use amora_codec::event::announcement_from_event;
use amora_core::{
    AmoraError, Announcement, ChainTag, MetaAddress, Result, StealthKeys, StealthPayment,
    TokenAmount, ViewingKey, WatchOnlyPayment,
};
use amora_crypto::contract_address::compute_account_address;
use amora_crypto::curve::derive_public_key;
use amora_scanner::{scan_announcements, scan_with_viewing_key};
use amora_stealth::payment::{create_stealth_address_with_rng, StealthAddressResult};

use crate::calls;
use crate::chain::{Call, ChainClient};

/// Blocks per event query; windows are fetched sequentially and in order.
const EVENT_PAGE_BLOCKS: u64 = 500;

/// How much to withdraw from a stealth account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawAmount {
    /// The account's full token balance, read via `balanceOf` first.
    All,
    /// An exact amount.
    Exact(TokenAmount),
}

/// One payment inside a batch.
#[derive(Clone, Debug)]
pub struct PaymentInstruction {
    /// Recipient meta-address.
    pub meta: MetaAddress,
    /// Token to transfer.
    pub token: FieldElement,
    /// Amount to transfer.
    pub amount: TokenAmount,
    /// Extra metadata felts appended after the conventional prefix.
    pub extra_metadata: Vec<FieldElement>,
}

impl PaymentInstruction {
    /// A payment with no extra metadata.
    pub fn new(meta: MetaAddress, token: FieldElement, amount: TokenAmount) -> Self {
        Self {
            meta,
            token,
            amount,
            extra_metadata: Vec::new(),
        }
    }
}

/// Thin orchestrator binding the protocol to a chain client.
///
/// Configuration is exactly these three fields; there is nothing dynamic
/// to extend.
pub struct AmoraClient<C> {
    chain: C,
    registry_address: FieldElement,
    account_class_hash: FieldElement,
}

impl<C: ChainClient> AmoraClient<C> {
    /// Binds a chain client to a registry and stealth-account class hash.
    pub fn new(chain: C, registry_address: FieldElement, account_class_hash: FieldElement) -> Self {
        Self {
            chain,
            registry_address,
            account_class_hash,
        }
    }

    /// The underlying chain client.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// The configured stealth-account class hash.
    pub fn account_class_hash(&self) -> FieldElement {
        self.account_class_hash
    }

    /// Registers `keys`' public halves as `account`'s meta-address.
    #[instrument(skip(self, keys))]
    pub async fn register(&self, account: FieldElement, keys: &StealthKeys) -> Result<FieldElement> {
        keys.validate()?;
        let call = calls::register_keys(
            self.registry_address,
            keys.spending.public,
            keys.viewing.public,
        );
        self.chain.execute(account, &[call]).await
    }

    /// Looks up a registrant's meta-address. `(0, 0)` from the registry
    /// means "not registered" and comes back as `None`, not an error.
    pub async fn get_meta_address(&self, registrant: FieldElement) -> Result<Option<MetaAddress>> {
        let output = self
            .chain
            .call(&calls::get_meta_address(self.registry_address, registrant))
            .await?;
        let (spending, viewing) = match output.as_slice() {
            [spending, viewing, ..] => (*spending, *viewing),
            _ => {
                return Err(AmoraError::Chain(
                    "registry returned a short meta-address response".into(),
                ))
            }
        };
        if spending == FieldElement::ZERO || viewing == FieldElement::ZERO {
            return Ok(None);
        }
        Ok(Some(MetaAddress::new(ChainTag::Starknet, spending, viewing)))
    }

    /// Whether a registrant has published a meta-address.
    pub async fn is_registered(&self, registrant: FieldElement) -> Result<bool> {
        let output = self
            .chain
            .call(&calls::is_registered(self.registry_address, registrant))
            .await?;
        match output.first() {
            Some(flag) => Ok(*flag != FieldElement::ZERO),
            None => Err(AmoraError::Chain(
                "registry returned an empty is_registered response".into(),
            )),
        }
    }

    /// Derives a fresh one-time address for `meta`. Pure; no chain access.
    pub fn generate_stealth_address(&self, meta: &MetaAddress) -> Result<StealthAddressResult> {
        self.generate_stealth_address_with_rng(meta, &mut OsRng)
    }

    /// [`Self::generate_stealth_address`] with an injected RNG.
    pub fn generate_stealth_address_with_rng<R: RngCore + CryptoRng>(
        &self,
        meta: &MetaAddress,
        rng: &mut R,
    ) -> Result<StealthAddressResult> {
        create_stealth_address_with_rng(meta, &self.account_class_hash, rng)
    }

    /// Builds the two calls a payment needs: the token transfer to the
    /// stealth address, then the registry announcement.
    pub fn build_send_calls(
        &self,
        token: FieldElement,
        amount: TokenAmount,
        stealth: &StealthAddressResult,
        extra_metadata: &[FieldElement],
    ) -> [Call; 2] {
        let metadata = calls::transfer_metadata(token, amount, extra_metadata);
        [
            calls::transfer(token, stealth.stealth_address, amount),
            calls::announce(
                self.registry_address,
                stealth.stealth_address,
                stealth.ephemeral_public_key,
                stealth.view_tag,
                &metadata,
            ),
        ]
    }

    /// Pays one recipient: derive, transfer, announce, in one multicall.
    #[instrument(skip(self, meta))]
    pub async fn send(
        &self,
        account: FieldElement,
        meta: &MetaAddress,
        token: FieldElement,
        amount: TokenAmount,
        extra_metadata: &[FieldElement],
    ) -> Result<(StealthAddressResult, FieldElement)> {
        let stealth = self.generate_stealth_address(meta)?;
        let calls = self.build_send_calls(token, amount, &stealth, extra_metadata);
        let tx_hash = self.chain.execute(account, &calls).await?;
        Ok((stealth, tx_hash))
    }

    /// Pays several recipients in a single multicall. Per-payment call
    /// pairs keep their order: transfer, announce, transfer, announce, ...
    #[instrument(skip(self, payments))]
    pub async fn batch_send(
        &self,
        account: FieldElement,
        payments: &[PaymentInstruction],
    ) -> Result<(Vec<StealthAddressResult>, FieldElement)> {
        let mut results = Vec::with_capacity(payments.len());
        let mut all_calls = Vec::with_capacity(payments.len() * 2);
        for payment in payments {
            let stealth = self.generate_stealth_address(&payment.meta)?;
            all_calls.extend(self.build_send_calls(
                payment.token,
                payment.amount,
                &stealth,
                &payment.extra_metadata,
            ));
            results.push(stealth);
        }
        let tx_hash = self.chain.execute(account, &all_calls).await?;
        Ok((results, tx_hash))
    }

    /// Fetches announcements in `[from_block, to_block]`, paging through
    /// event windows in order. Malformed records are skipped, not fatal.
    #[instrument(skip(self))]
    pub async fn fetch_announcements(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Announcement>> {
        let mut announcements = Vec::new();
        let mut start = from_block;
        while start <= to_block {
            let end = start.saturating_add(EVENT_PAGE_BLOCKS - 1).min(to_block);
            let events = self
                .chain
                .get_events(self.registry_address, start, end)
                .await?;
            debug!(start, end, events = events.len(), "fetched event page");
            for event in events {
                match announcement_from_event(
                    &event.data,
                    event.block_number,
                    event.transaction_hash,
                ) {
                    Ok(announcement) => announcements.push(announcement),
                    Err(err) => {
                        warn!(%err, "skipping malformed announcement event");
                    }
                }
            }
            start = match end.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(announcements)
    }

    /// Fetches and scans with the full key set.
    #[instrument(skip(self, keys))]
    pub async fn scan(
        &self,
        keys: &StealthKeys,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<StealthPayment>> {
        let announcements = self.fetch_announcements(from_block, to_block).await?;
        scan_announcements(&announcements, keys, &self.account_class_hash)
    }

    /// Fetches and scans with a watch-only capability.
    #[instrument(skip(self, key))]
    pub async fn scan_watch_only(
        &self,
        key: &ViewingKey,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<WatchOnlyPayment>> {
        let announcements = self.fetch_announcements(from_block, to_block).await?;
        scan_with_viewing_key(&announcements, key, &self.account_class_hash)
    }

    /// Drains a discovered payment: deploys the stealth account if it does
    /// not exist yet, then transfers `amount` to `destination`.
    ///
    /// Each chain call completes before the next is issued.
    #[instrument(skip(self, payment))]
    pub async fn deploy_and_withdraw(
        &self,
        payment: &StealthPayment,
        destination: FieldElement,
        token: FieldElement,
        amount: WithdrawAmount,
    ) -> Result<FieldElement> {
        let public_key = derive_public_key(&payment.stealth_private_key)?;
        let address = compute_account_address(&public_key, &self.account_class_hash);

        if !self.chain.is_deployed(address).await? {
            debug!(address = %amora_core::serde_felt::to_hex(&address), "deploying stealth account");
            self.chain
                .deploy_account(self.account_class_hash, public_key, &[public_key])
                .await?;
        }

        let amount = match amount {
            WithdrawAmount::Exact(amount) => amount,
            WithdrawAmount::All => {
                let output = self.chain.call(&calls::balance_of(token, address)).await?;
                match output.as_slice() {
                    [low, high, ..] => TokenAmount::from_felts(low, high).ok_or_else(|| {
                        AmoraError::Chain("token returned an out-of-range balance".into())
                    })?,
                    _ => {
                        return Err(AmoraError::Chain(
                            "token returned a short balance response".into(),
                        ))
                    }
                }
            }
        };

        self.chain
            .execute(address, &[calls::transfer(token, destination, amount)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::{
        SELECTOR_ANNOUNCE, SELECTOR_BALANCE_OF, SELECTOR_GET_META_ADDRESS, SELECTOR_IS_REGISTERED,
        SELECTOR_REGISTER_KEYS, SELECTOR_TRANSFER,
    };
    use crate::chain::EmittedEvent;
    use amora_crypto::keys::generate_stealth_keys_with_rng;
    use amora_stealth::wallet::import_viewing_key;
    use async_trait::async_trait;
    use parking_lot::RwLock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn felt(v: u64) -> FieldElement {
        FieldElement::from(v)
    }

    fn registry() -> FieldElement {
        felt(0x5152)
    }

    #[derive(Default)]
    struct MockState {
        registered: HashMap<FieldElement, (FieldElement, FieldElement)>,
        events: Vec<EmittedEvent>,
        balances: HashMap<(FieldElement, FieldElement), TokenAmount>,
        deployed: HashSet<FieldElement>,
        deploys: Vec<(FieldElement, FieldElement, Vec<FieldElement>)>,
        executed: Vec<(FieldElement, Vec<Call>)>,
        next_block: u64,
        tx_counter: u64,
    }

    /// In-memory chain implementing the registry and ERC-20 semantics the
    /// client relies on.
    struct MockChain {
        registry: FieldElement,
        state: RwLock<MockState>,
    }

    impl MockChain {
        fn new(registry: FieldElement) -> Self {
            Self {
                registry,
                state: RwLock::new(MockState::default()),
            }
        }

        fn push_raw_event(&self, data: Vec<FieldElement>, block: u64) {
            self.state.write().events.push(EmittedEvent {
                data,
                block_number: Some(block),
                transaction_hash: None,
            });
        }
    }

    #[async_trait]
    impl ChainClient for MockChain {
        async fn call(&self, call: &Call) -> Result<Vec<FieldElement>> {
            let state = self.state.read();
            match call.selector.as_str() {
                SELECTOR_GET_META_ADDRESS if call.to == self.registry => {
                    let registrant = call.calldata[0];
                    let (s, v) = state
                        .registered
                        .get(&registrant)
                        .copied()
                        .unwrap_or((FieldElement::ZERO, FieldElement::ZERO));
                    Ok(vec![s, v])
                }
                SELECTOR_IS_REGISTERED if call.to == self.registry => {
                    let registrant = call.calldata[0];
                    let flag = state.registered.contains_key(&registrant);
                    Ok(vec![if flag { FieldElement::ONE } else { FieldElement::ZERO }])
                }
                SELECTOR_BALANCE_OF => {
                    let holder = call.calldata[0];
                    let balance = state
                        .balances
                        .get(&(call.to, holder))
                        .copied()
                        .unwrap_or(TokenAmount::ZERO);
                    Ok(vec![balance.low_felt(), balance.high_felt()])
                }
                other => Err(AmoraError::Chain(format!("unexpected call to {other}"))),
            }
        }

        async fn get_events(
            &self,
            emitter: FieldElement,
            from_block: u64,
            to_block: u64,
        ) -> Result<Vec<EmittedEvent>> {
            if emitter != self.registry {
                return Ok(Vec::new());
            }
            Ok(self
                .state
                .read()
                .events
                .iter()
                .filter(|e| {
                    e.block_number
                        .map(|b| b >= from_block && b <= to_block)
                        .unwrap_or(false)
                })
                .cloned()
                .collect())
        }

        async fn execute(&self, account: FieldElement, calls: &[Call]) -> Result<FieldElement> {
            let mut state = self.state.write();
            state.next_block += 1;
            state.tx_counter += 1;
            let block = state.next_block;
            let tx_hash = felt(0xf000 + state.tx_counter);

            for call in calls {
                match call.selector.as_str() {
                    SELECTOR_REGISTER_KEYS if call.to == self.registry => {
                        state
                            .registered
                            .insert(account, (call.calldata[0], call.calldata[1]));
                    }
                    SELECTOR_ANNOUNCE if call.to == self.registry => {
                        let mut data = vec![call.calldata[0], account];
                        data.extend_from_slice(&call.calldata[1..]);
                        state.events.push(EmittedEvent {
                            data,
                            block_number: Some(block),
                            transaction_hash: Some(tx_hash),
                        });
                    }
                    SELECTOR_TRANSFER => {
                        let recipient = call.calldata[0];
                        let amount =
                            TokenAmount::from_felts(&call.calldata[1], &call.calldata[2])
                                .expect("mock transfer amount");
                        let entry = state
                            .balances
                            .entry((call.to, recipient))
                            .or_insert(TokenAmount::ZERO);
                        *entry = TokenAmount::new(entry.low + amount.low, entry.high + amount.high);
                    }
                    other => {
                        return Err(AmoraError::Chain(format!("unexpected execute of {other}")))
                    }
                }
            }

            state.executed.push((account, calls.to_vec()));
            Ok(tx_hash)
        }

        async fn is_deployed(&self, address: FieldElement) -> Result<bool> {
            Ok(self.state.read().deployed.contains(&address))
        }

        async fn deploy_account(
            &self,
            class_hash: FieldElement,
            salt: FieldElement,
            constructor_calldata: &[FieldElement],
        ) -> Result<FieldElement> {
            let mut state = self.state.write();
            state.tx_counter += 1;
            state
                .deploys
                .push((class_hash, salt, constructor_calldata.to_vec()));
            // The address formula is what the client is exercising, so the
            // mock recomputes it the same way.
            let address = compute_account_address(&salt, &class_hash);
            state.deployed.insert(address);
            Ok(felt(0xf000 + state.tx_counter))
        }
    }

    fn client() -> AmoraClient<MockChain> {
        AmoraClient::new(MockChain::new(registry()), registry(), felt(0xc1a55))
    }

    fn keys(seed: u64) -> StealthKeys {
        generate_stealth_keys_with_rng(&mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[tokio::test]
    async fn register_then_lookup() {
        let client = client();
        let alice = felt(0xa11ce);
        let keys = keys(1);

        assert!(!client.is_registered(alice).await.unwrap());
        assert!(client.get_meta_address(alice).await.unwrap().is_none());

        client.register(alice, &keys).await.unwrap();

        assert!(client.is_registered(alice).await.unwrap());
        let meta = client.get_meta_address(alice).await.unwrap().unwrap();
        assert_eq!(meta.spending_public_key, keys.spending.public);
        assert_eq!(meta.viewing_public_key, keys.viewing.public);
    }

    #[tokio::test]
    async fn single_payment_roundtrip() {
        let client = client();
        let sender = felt(0x5e4d);
        let recipient_keys = keys(2);
        let meta = recipient_keys.meta_address(ChainTag::Starknet);
        let token = felt(0x70ce4);

        let (stealth, _tx) = client
            .send(sender, &meta, token, TokenAmount::from(1000u128), &[])
            .await
            .unwrap();

        let payments = client.scan(&recipient_keys, 0, 100).await.unwrap();
        assert_eq!(payments.len(), 1);
        let payment = &payments[0];

        // The recovered key controls exactly the account the sender funded.
        assert_eq!(
            derive_public_key(&payment.stealth_private_key).unwrap(),
            stealth.stealth_public_key
        );
        assert_eq!(payment.announcement.stealth_address, stealth.stealth_address);
        assert_eq!(payment.announcement.caller_address, Some(sender));
        assert_eq!(payment.announcement.token_address(), Some(token));
        assert_eq!(
            payment.announcement.amount(),
            Some(TokenAmount::from(1000u128))
        );
    }

    #[tokio::test]
    async fn two_derivations_are_unlinkable() {
        let client = client();
        let meta = keys(3).meta_address(ChainTag::Starknet);

        let a = client.generate_stealth_address(&meta).unwrap();
        let b = client.generate_stealth_address(&meta).unwrap();
        assert_ne!(a.stealth_address, b.stealth_address);
        assert_ne!(a.ephemeral_public_key, b.ephemeral_public_key);
    }

    #[tokio::test]
    async fn scan_ignores_payments_to_others() {
        let client = client();
        let keys_a = keys(4);
        let keys_b = keys(5);
        let meta_b = keys_b.meta_address(ChainTag::Starknet);

        client
            .send(felt(1), &meta_b, felt(2), TokenAmount::from(5u128), &[])
            .await
            .unwrap();

        assert!(client.scan(&keys_a, 0, 100).await.unwrap().is_empty());
        assert_eq!(client.scan(&keys_b, 0, 100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_send_orders_call_pairs() {
        let client = client();
        let token = felt(0x70ce4);
        let payments = vec![
            PaymentInstruction::new(
                keys(6).meta_address(ChainTag::Starknet),
                token,
                TokenAmount::from(1000u128),
            ),
            PaymentInstruction::new(
                keys(7).meta_address(ChainTag::Starknet),
                token,
                TokenAmount::from(2000u128),
            ),
            PaymentInstruction::new(
                keys(8).meta_address(ChainTag::Starknet),
                token,
                TokenAmount::from(500u128),
            ),
        ];

        let (results, _tx) = client.batch_send(felt(9), &payments).await.unwrap();

        // Three distinct stealth addresses.
        assert_eq!(results.len(), 3);
        assert_ne!(results[0].stealth_address, results[1].stealth_address);
        assert_ne!(results[1].stealth_address, results[2].stealth_address);
        assert_ne!(results[0].stealth_address, results[2].stealth_address);

        // One multicall of six calls: transfer, announce, three times over.
        let state = client.chain().state.read();
        let (_, calls) = state.executed.last().unwrap();
        assert_eq!(calls.len(), 6);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(calls[2 * i].selector, SELECTOR_TRANSFER);
            assert_eq!(calls[2 * i].calldata[0], result.stealth_address);
            assert_eq!(calls[2 * i + 1].selector, SELECTOR_ANNOUNCE);
            assert_eq!(calls[2 * i + 1].calldata[0], result.stealth_address);
        }
    }

    #[tokio::test]
    async fn watch_only_scan_matches_full_scan() {
        let client = client();
        let recipient_keys = keys(10);
        let meta = recipient_keys.meta_address(ChainTag::Starknet);

        for amount in [100u128, 200, 300] {
            client
                .send(felt(1), &meta, felt(2), TokenAmount::from(amount), &[])
                .await
                .unwrap();
        }
        // Noise for someone else.
        client
            .send(
                felt(1),
                &keys(11).meta_address(ChainTag::Starknet),
                felt(2),
                TokenAmount::from(7u128),
                &[],
            )
            .await
            .unwrap();

        let wallet = amora_stealth::wallet::AmoraWallet::from_keys(recipient_keys).unwrap();
        let viewing = import_viewing_key(&wallet.export_viewing_key()).unwrap();

        let full = client.scan(&recipient_keys, 0, 100).await.unwrap();
        let watch = client.scan_watch_only(&viewing, 0, 100).await.unwrap();

        assert_eq!(full.len(), 3);
        assert_eq!(watch.len(), 3);
        for (f, w) in full.iter().zip(&watch) {
            assert_eq!(f.announcement, w.announcement);
            assert_eq!(f.stealth_public_key, w.stealth_public_key);
            assert_eq!(f.shared_secret, w.shared_secret);
        }
    }

    #[tokio::test]
    async fn deploy_and_withdraw_all() {
        let client = client();
        let recipient_keys = keys(12);
        let meta = recipient_keys.meta_address(ChainTag::Starknet);
        let token = felt(0x70ce4);
        let destination = felt(0xde57);

        client
            .send(felt(1), &meta, token, TokenAmount::from(1000u128), &[])
            .await
            .unwrap();
        let payment = client.scan(&recipient_keys, 0, 100).await.unwrap().remove(0);

        let tx = client
            .deploy_and_withdraw(&payment, destination, token, WithdrawAmount::All)
            .await
            .unwrap();
        assert_ne!(tx, FieldElement::ZERO);

        {
            let state = client.chain().state.read();

            // Counterfactual deployment used the stealth public key as both
            // salt and sole constructor argument.
            assert_eq!(state.deploys.len(), 1);
            let (class_hash, salt, calldata) = &state.deploys[0];
            assert_eq!(*class_hash, client.account_class_hash());
            assert_eq!(*salt, payment.stealth_public_key);
            assert_eq!(calldata, &vec![payment.stealth_public_key]);

            // The withdrawal came from the stealth account and moved the
            // whole balance.
            let (account, calls) = state.executed.last().unwrap();
            assert_eq!(*account, payment.announcement.stealth_address);
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].selector, SELECTOR_TRANSFER);
            assert_eq!(calls[0].calldata[0], destination);
            assert_eq!(calls[0].calldata[1], felt(1000));
        }

        // A second withdrawal sees the account already deployed.
        client
            .deploy_and_withdraw(
                &payment,
                destination,
                token,
                WithdrawAmount::Exact(TokenAmount::from(1u128)),
            )
            .await
            .unwrap();
        assert_eq!(client.chain().state.read().deploys.len(), 1);
    }

    #[tokio::test]
    async fn fetch_skips_malformed_events() {
        let client = client();
        let recipient_keys = keys(13);
        let meta = recipient_keys.meta_address(ChainTag::Starknet);

        // A record too short to be an announcement, between two valid ones.
        client
            .send(felt(1), &meta, felt(2), TokenAmount::from(1u128), &[])
            .await
            .unwrap();
        client.chain().push_raw_event(vec![felt(1), felt(2), felt(3)], 50);
        client
            .send(felt(1), &meta, felt(2), TokenAmount::from(2u128), &[])
            .await
            .unwrap();

        let announcements = client.fetch_announcements(0, 100).await.unwrap();
        assert_eq!(announcements.len(), 2);
        assert_eq!(client.scan(&recipient_keys, 0, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetch_pages_preserve_order() {
        let client = client();
        let recipient_keys = keys(14);
        let meta = recipient_keys.meta_address(ChainTag::Starknet);

        // Spread three announcements over blocks 1..=3, then fetch a range
        // wide enough to need multiple pages.
        for amount in [1u128, 2, 3] {
            client
                .send(felt(1), &meta, felt(2), TokenAmount::from(amount), &[])
                .await
                .unwrap();
        }

        let announcements = client.fetch_announcements(0, 1500).await.unwrap();
        let blocks: Vec<u64> = announcements.iter().filter_map(|a| a.block_number).collect();
        assert_eq!(blocks, vec![1, 2, 3]);
    }
}
