use alloy::primitives::{Address, Bytes, U256};
use mockall::predicate;
use serde_json::{json, Value};

use pnetwork_monitor::services::blockchain::{
	calls, BlockChainClient, BlockChainError, ContractReader, EvmClient, EvmClientTrait,
};

use crate::integration::mocks::{address_word, MockRpcTransport};

fn rpc_result(result: Value) -> Value {
	json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

#[tokio::test]
async fn test_get_latest_block_number() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_blockNumber"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(rpc_result(json!("0x2a5c2f1"))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_latest_block_number().await.unwrap(), 44_417_777);
}

#[tokio::test]
async fn test_get_block_timestamp() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| {
			method == "eth_getBlockByNumber" && *params == Some(json!(["0x64", false]))
		})
		.times(1)
		.returning(|_, _| Ok(rpc_result(json!({"number": "0x64", "timestamp": "0x6553f100"}))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_block_timestamp(100).await.unwrap(), 1_700_000_000);
}

#[tokio::test]
async fn test_unknown_block_is_an_error() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(Value::Null)));

	let client = EvmClient::new_with_transport(transport);
	let error = client.get_block_timestamp(7).await.unwrap_err();
	assert!(error.downcast_ref::<BlockChainError>().is_some());
	assert!(error.to_string().contains('7'));
}

#[tokio::test]
async fn test_get_logs_sends_range_and_topics() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| {
			let Some(filter) = params.as_ref().and_then(|p| p.get(0)) else {
				return false;
			};
			method == "eth_getLogs"
				&& filter["fromBlock"] == "0x0"
				&& filter["toBlock"] == "0x270f"
				&& filter["topics"] == json!(["0xabc"])
		})
		.times(1)
		.returning(|_, _| {
			Ok(rpc_result(json!([{
				"address": "0x0000000000000000000000000000000000000001",
				"topics": ["0x33fe909c76b8ce2d80c623608e768bdb2c69f1d53f55d56d0e562a6e9c567288"],
				"data": "0x",
				"blockNumber": "0x10",
				"transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111"
			}])))
		});

	let client = EvmClient::new_with_transport(transport);
	let logs = client
		.get_logs("0x0000000000000000000000000000000000000001", vec!["0xabc".to_string()], 0, 9_999)
		.await
		.unwrap();
	assert_eq!(logs.len(), 1);
	assert_eq!(logs[0].block_number(), Some(16));
}

#[tokio::test]
async fn test_malformed_logs_are_a_decode_error() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(json!([{"address": "nope"}]))));

	let client = EvmClient::new_with_transport(transport);
	let error = client.get_logs("0x01", Vec::new(), 0, 1).await.unwrap_err();
	assert!(matches!(
		error.downcast_ref::<BlockChainError>(),
		Some(BlockChainError::DecodeError(_))
	));
}

#[tokio::test]
async fn test_get_balance() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| method == "eth_getBalance" && params.as_ref().unwrap()[1] == "latest")
		.returning(|_, _| Ok(rpc_result(json!("0xde0b6b3a7640000"))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(
		client.get_balance("0x0000000000000000000000000000000000000002").await.unwrap(),
		U256::from(1_000_000_000_000_000_000u64)
	);
}

#[tokio::test]
async fn test_contract_reader_decodes_call_result() {
	let hub = Address::repeat_byte(0x33);
	let selector = format!("0x{}", hex::encode(calls::HUB.selector()));
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(move |method, params| {
			method == "eth_call" && params.as_ref().unwrap()[0]["data"] == selector.as_str()
		})
		.returning(move |_, _| Ok(rpc_result(json!(address_word(hub).to_string()))));

	let client = EvmClient::new_with_transport(transport);
	let reader = ContractReader::new(&client);
	let found = reader
		.read_address("0x4650787da4A497496e514EcCFd6F888B7804ebBe", &calls::HUB)
		.await
		.unwrap();
	assert_eq!(found, hub);
}

#[tokio::test]
async fn test_call_without_result_is_a_request_error() {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1})));

	let client = EvmClient::new_with_transport(transport);
	let error = client.call("0x01", Bytes::new()).await.unwrap_err();
	assert!(error.to_string().contains("missing 'result'"));
}
