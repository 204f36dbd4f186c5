//! Tests for swap transaction assembly: category ordering, account
//! normalization and pre-built transaction passthrough.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use nova_swap::swap::instructions::{compile, decode_prebuilt, linearize, SwapInstructionsResponse};
use nova_swap::SwapError;
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

fn instruction_spec(program_id: &Pubkey, accounts: Value) -> Value {
    json!({
        "programId": program_id.to_string(),
        "accounts": accounts,
        "data": BASE64.encode([1u8, 2, 3]),
    })
}

#[test]
fn categories_assemble_in_fixed_order_regardless_of_input_order() {
    let cleanup_program = Pubkey::new_unique();
    let swap_program = Pubkey::new_unique();
    let setup_program = Pubkey::new_unique();

    // Response fields listed cleanup-first; serde field order is irrelevant,
    // the assembler must still emit [setup, swap, cleanup].
    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "cleanupInstruction": instruction_spec(&cleanup_program, json!([])),
        "swapInstruction": instruction_spec(&swap_program, json!([])),
        "setupInstructions": [instruction_spec(&setup_program, json!([]))],
    }))
    .expect("response should deserialize");

    let instructions = linearize(&response).expect("linearize should succeed");
    let programs: Vec<Pubkey> = instructions.iter().map(|i| i.program_id).collect();
    assert_eq!(programs, vec![setup_program, swap_program, cleanup_program]);
}

#[test]
fn within_category_order_is_preserved() {
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();
    let swap_program = Pubkey::new_unique();

    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "swapInstruction": instruction_spec(&swap_program, json!([])),
        "setupInstructions": [
            instruction_spec(&first, json!([])),
            instruction_spec(&second, json!([])),
        ],
    }))
    .expect("response should deserialize");

    let instructions = linearize(&response).expect("linearize should succeed");
    let programs: Vec<Pubkey> = instructions.iter().map(|i| i.program_id).collect();
    assert_eq!(programs, vec![first, second, swap_program]);
}

#[test]
fn account_lists_normalize_from_both_wire_shapes() {
    let program = Pubkey::new_unique();
    let plain = Pubkey::new_unique();
    let flagged = Pubkey::new_unique();

    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "swapInstruction": instruction_spec(
            &program,
            json!([
                plain.to_string(),
                { "pubkey": flagged.to_string(), "isSigner": true, "isWritable": true },
            ]),
        ),
    }))
    .expect("response should deserialize");

    let instructions = linearize(&response).expect("linearize should succeed");
    let accounts = &instructions[0].accounts;

    assert_eq!(accounts[0].pubkey, plain);
    assert!(!accounts[0].is_signer);
    assert!(!accounts[0].is_writable);

    assert_eq!(accounts[1].pubkey, flagged);
    assert!(accounts[1].is_signer);
    assert!(accounts[1].is_writable);
}

#[test]
fn keys_alias_is_accepted_for_account_lists() {
    let program = Pubkey::new_unique();
    let account = Pubkey::new_unique();

    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "swapInstruction": {
            "programId": program.to_string(),
            "keys": [{ "pubkey": account.to_string() }],
            "data": BASE64.encode([0u8]),
        },
    }))
    .expect("response should deserialize");

    let instructions = linearize(&response).expect("linearize should succeed");
    assert_eq!(instructions[0].accounts[0].pubkey, account);
    assert!(!instructions[0].accounts[0].is_signer);
}

#[test]
fn prebuilt_transaction_passes_through_byte_identical() {
    let payer = Pubkey::new_unique();
    let program = Pubkey::new_unique();
    let instruction = Instruction {
        program_id: program,
        accounts: vec![],
        data: vec![4, 5, 6],
    };
    let transaction = compile(&payer, Hash::new_unique(), &[instruction])
        .expect("compile should succeed");

    let bytes = bincode::serialize(&transaction).expect("transaction should serialize");
    let blob = BASE64.encode(&bytes);

    let decoded = decode_prebuilt(&blob).expect("decode should succeed");
    let round_trip = bincode::serialize(&decoded).expect("decoded transaction should serialize");
    assert_eq!(round_trip, bytes);
}

#[test]
fn response_without_transaction_or_swap_instruction_is_not_swappable() {
    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "computeBudgetInstructions": [],
        "otherInstructions": [],
    }))
    .expect("response should deserialize");

    assert!(response.swap_transaction.is_none());
    assert!(!response.has_instructions());
}

#[test]
fn malformed_pubkey_is_an_assembly_error() {
    let response: SwapInstructionsResponse = serde_json::from_value(json!({
        "swapInstruction": {
            "programId": "not-a-pubkey",
            "accounts": [],
            "data": BASE64.encode([0u8]),
        },
    }))
    .expect("response should deserialize");

    assert!(matches!(
        linearize(&response),
        Err(SwapError::InstructionAssembly(_))
    ));
}

#[test]
fn compiled_transaction_binds_payer_and_blockhash() {
    let payer = Pubkey::new_unique();
    let blockhash = Hash::new_unique();
    let instruction = Instruction {
        program_id: Pubkey::new_unique(),
        accounts: vec![],
        data: vec![7],
    };

    let transaction =
        compile(&payer, blockhash, &[instruction]).expect("compile should succeed");

    assert_eq!(transaction.message.recent_blockhash(), &blockhash);
    assert_eq!(transaction.message.static_account_keys()[0], payer);
    assert_eq!(
        transaction.signatures.len(),
        transaction.message.header().num_required_signatures as usize
    );
}
