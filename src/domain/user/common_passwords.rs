//! Passwords rejected at registration regardless of length

pub const COMMON_PASSWORDS: &[&str] = &[
    "password", "12345678", "123456789", "1234567890", "qwertyuiop", "password1", "password12",
    "password123", "passw0rd", "p@ssw0rd", "p@ssword", "iloveyou", "sunshine", "princess",
    "football", "baseball", "basketball", "superman", "batman123", "trustno1", "welcome1",
    "welcome123", "letmein1", "letmein123", "abc12345", "abcd1234", "abcdefgh", "1q2w3e4r",
    "1q2w3e4r5t", "1qaz2wsx", "zaq12wsx", "qwerty123", "qwerty12", "qwertyui", "asdfghjk",
    "asdfghjkl", "zxcvbnm1", "zxcvbnm123", "11111111", "00000000", "88888888", "87654321",
    "12341234", "11223344", "12344321", "123123123", "123qweasd", "qazwsxedc", "q1w2e3r4",
    "q1w2e3r4t5", "1234qwer", "qwer1234", "admin123", "administrator", "changeme", "computer",
    "internet", "whatever", "starwars", "pokemon1", "jennifer", "michelle", "jordan23",
    "liverpool", "chelsea1", "arsenal1", "mustang1", "corvette", "ferrari1", "mercedes",
    "midnight", "charlie1", "butterfly", "chocolate", "cookie123", "dragon12", "master123",
    "monkey12", "shadow12", "spiderman", "sunflower", "superstar", "thunder1", "tigger12",
    "blink182", "samsung1", "michael1", "jessica1", "ashley12", "daniel12", "nicole12",
    "freedom1", "hello123", "hellokitty", "lovely12", "loveme12", "secret12", "security",
    "qwerty1234", "aaaaaaaa", "passport", "postgres", "testtest", "test1234", "trustme1",
];
